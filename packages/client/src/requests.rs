//! JSON request bodies, one per endpoint.

use serde::Serialize;
use sylithe_analysis_models::AreaOfInterest;

#[derive(Debug, Serialize)]
pub struct LulcRequest<'a> {
    pub aoi: &'a AreaOfInterest,
    pub start_date: &'a str,
    pub end_date: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TimelineRequest<'a> {
    pub aoi: &'a AreaOfInterest,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Serialize)]
pub struct BaselineRequest<'a> {
    pub aoi: &'a AreaOfInterest,
    pub baseline_year: i32,
}

#[derive(Debug, Serialize)]
pub struct LockBaselineRequest<'a> {
    pub baseline_id: &'a str,
    pub locked_by: &'a str,
}

/// Shared by change detection, risk assessment and leakage analysis.
#[derive(Debug, Serialize)]
pub struct StageRequest<'a> {
    pub baseline_id: &'a str,
    pub current_year: i32,
    pub aoi: &'a AreaOfInterest,
}

#[derive(Debug, Serialize)]
pub struct DacbRequest<'a> {
    pub aoi: &'a AreaOfInterest,
    pub baseline_year: i32,
    pub current_year: i32,
    pub buffer_km: f64,
    pub use_knn: bool,
}

#[derive(Debug, Serialize)]
pub struct ChmRequest<'a> {
    pub geojson: &'a AreaOfInterest,
    pub year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aoi() -> AreaOfInterest {
        AreaOfInterest::parse(r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#)
            .unwrap()
    }

    #[test]
    fn stage_request_shape() {
        let aoi = aoi();
        let value = serde_json::to_value(StageRequest {
            baseline_id: "b1",
            current_year: 2023,
            aoi: &aoi,
        })
        .unwrap();

        assert_eq!(value["baseline_id"], "b1");
        assert_eq!(value["current_year"], 2023);
        assert_eq!(value["aoi"]["type"], "Polygon");
    }

    #[test]
    fn dacb_request_carries_buffer_and_knn_flag() {
        let aoi = aoi();
        let value = serde_json::to_value(DacbRequest {
            aoi: &aoi,
            baseline_year: 2019,
            current_year: 2023,
            buffer_km: 5.0,
            use_knn: false,
        })
        .unwrap();

        assert_eq!(value["buffer_km"], 5.0);
        assert_eq!(value["use_knn"], false);
        assert_eq!(value["baseline_year"], 2019);
    }

    #[test]
    fn chm_request_sends_shape_as_geojson() {
        let aoi = aoi();
        let value = serde_json::to_value(ChmRequest {
            geojson: &aoi,
            year: 2023,
        })
        .unwrap();

        assert_eq!(value["geojson"]["type"], "Polygon");
        assert_eq!(value["year"], 2023);
    }
}
