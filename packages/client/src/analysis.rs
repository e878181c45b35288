//! `reqwest` implementation of [`AnalysisApi`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use sylithe_analysis_models::{
    AreaOfInterest, Baseline, ChangeResult, DacbResult, LeakageResult, LockReceipt, LulcResult,
    RiskResult, Timeline,
};

use crate::requests::{
    BaselineRequest, DacbRequest, LockBaselineRequest, LulcRequest, StageRequest, TimelineRequest,
};
use crate::{AnalysisApi, ClientConfig, ClientError, ensure_success};

/// Analysis backend client.
pub struct HttpAnalysisClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    /// Creates a client for the backend at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        log::debug!("POST {url}");

        let resp = self.client.post(&url).json(body).send().await?;
        decode(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url}");

        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if let Err(e) = ensure_success(status) {
        log::warn!("{} returned {status}", resp.url());
        return Err(e);
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait::async_trait]
impl AnalysisApi for HttpAnalysisClient {
    async fn analyze_lulc(
        &self,
        aoi: &AreaOfInterest,
        start_date: &str,
        end_date: &str,
    ) -> Result<LulcResult, ClientError> {
        self.post(
            "/api/lulc/analyze",
            &LulcRequest {
                aoi,
                start_date,
                end_date,
            },
        )
        .await
    }

    async fn analyze_timeline(
        &self,
        aoi: &AreaOfInterest,
        start_year: i32,
        end_year: i32,
    ) -> Result<Timeline, ClientError> {
        self.post(
            "/api/lulc/timeline",
            &TimelineRequest {
                aoi,
                start_year,
                end_year,
            },
        )
        .await
    }

    async fn create_baseline(
        &self,
        aoi: &AreaOfInterest,
        baseline_year: i32,
    ) -> Result<Baseline, ClientError> {
        self.post(
            "/api/baseline/create",
            &BaselineRequest { aoi, baseline_year },
        )
        .await
    }

    async fn lock_baseline(
        &self,
        baseline_id: &str,
        locked_by: &str,
    ) -> Result<LockReceipt, ClientError> {
        self.post(
            "/api/baseline/lock",
            &LockBaselineRequest {
                baseline_id,
                locked_by,
            },
        )
        .await
    }

    async fn get_baseline(&self, baseline_id: &str) -> Result<Baseline, ClientError> {
        self.get(&format!("/api/baseline/{baseline_id}")).await
    }

    async fn detect_changes(
        &self,
        baseline_id: &str,
        current_year: i32,
        aoi: &AreaOfInterest,
    ) -> Result<ChangeResult, ClientError> {
        self.post(
            "/api/change-detection",
            &StageRequest {
                baseline_id,
                current_year,
                aoi,
            },
        )
        .await
    }

    async fn assess_risk(
        &self,
        baseline_id: &str,
        current_year: i32,
        aoi: &AreaOfInterest,
    ) -> Result<RiskResult, ClientError> {
        self.post(
            "/api/risk-assessment",
            &StageRequest {
                baseline_id,
                current_year,
                aoi,
            },
        )
        .await
    }

    async fn analyze_leakage(
        &self,
        baseline_id: &str,
        current_year: i32,
        aoi: &AreaOfInterest,
    ) -> Result<LeakageResult, ClientError> {
        self.post(
            "/api/leakage-analysis",
            &StageRequest {
                baseline_id,
                current_year,
                aoi,
            },
        )
        .await
    }

    async fn analyze_dacb(
        &self,
        aoi: &AreaOfInterest,
        baseline_year: i32,
        current_year: i32,
        buffer_km: f64,
        use_knn: bool,
    ) -> Result<DacbResult, ClientError> {
        self.post(
            "/api/dacb/analyze",
            &DacbRequest {
                aoi,
                baseline_year,
                current_year,
                buffer_km,
                use_knn,
            },
        )
        .await
    }
}
