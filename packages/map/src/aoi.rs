//! Area-of-interest helpers: file import, rectangle drawing and footprint
//! measurements used for framing and display.

use std::path::Path;

use geo::orient::{Direction, Orient};
use geo::{BoundingRect, Centroid, GeodesicArea, Geometry, GeometryCollection};
use geojson::GeoJson;
use sylithe_analysis_models::{AoiError, AreaOfInterest};

use crate::{LOCATION_ZOOM, LatLng};

/// Reads a `GeoJSON` file and passes the shape through as-is.
///
/// # Errors
///
/// * [`AoiError::Io`] if the file cannot be read
/// * [`AoiError::Parse`] if it is not `GeoJSON`
pub fn import_aoi(path: impl AsRef<Path>) -> Result<AreaOfInterest, AoiError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let aoi = AreaOfInterest::parse(&text)?;
    log::info!("Imported {} from {}", aoi.kind(), path.display());
    Ok(aoi)
}

/// Builds the `Feature` a rectangle draw tool emits for the given corners.
/// The exterior ring runs counter-clockwise.
///
/// # Errors
///
/// Returns [`AoiError::Parse`] if the coordinates are not finite.
pub fn rectangle(south_west: LatLng, north_east: LatLng) -> Result<AreaOfInterest, AoiError> {
    let (west, south, east, north) = (
        south_west.lng,
        south_west.lat,
        north_east.lng,
        north_east.lat,
    );

    let value = serde_json::json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [west, south],
                [east, south],
                [east, north],
                [west, north],
                [west, south]
            ]]
        }
    });

    Ok(AreaOfInterest::new(GeoJson::from_json_value(value)?))
}

/// Extent, centre and approximate size of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub south_west: LatLng,
    pub north_east: LatLng,
    pub centroid: LatLng,
    /// Geodesic area in km². Zero for points and lines.
    pub area_km2: f64,
}

impl Footprint {
    /// Measures every geometry in `aoi`. Returns `None` when the shape has
    /// no convertible geometry.
    #[must_use]
    pub fn of(aoi: &AreaOfInterest) -> Option<Self> {
        let geometries: Vec<Geometry<f64>> = aoi
            .geometries()
            .into_iter()
            .filter_map(|g| match Geometry::<f64>::try_from(g.clone()) {
                Ok(geometry) => Some(oriented(geometry)),
                Err(e) => {
                    log::warn!("Skipping unconvertible geometry: {e}");
                    None
                }
            })
            .collect();

        if geometries.is_empty() {
            return None;
        }

        let area_m2: f64 = geometries.iter().map(|g| g.geodesic_area_unsigned()).sum();
        let collection = GeometryCollection::new_from(geometries);
        let rect = collection.bounding_rect()?;
        let centroid = collection.centroid()?;

        Some(Self {
            south_west: LatLng::new(rect.min().y, rect.min().x),
            north_east: LatLng::new(rect.max().y, rect.max().x),
            centroid: LatLng::new(centroid.y(), centroid.x()),
            area_km2: area_m2 / 1_000_000.0,
        })
    }

    /// Widest side of the bounding box in degrees.
    #[must_use]
    pub fn span_degrees(&self) -> f64 {
        (self.north_east.lat - self.south_west.lat).max(self.north_east.lng - self.south_west.lng)
    }

    /// Web-mercator zoom at which the bounding box roughly fills the view.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fit_zoom(&self) -> u8 {
        let span = self.span_degrees();
        if span <= 0.0 || !span.is_finite() {
            return LOCATION_ZOOM;
        }
        (360.0 / span).log2().floor().clamp(1.0, 18.0) as u8
    }
}

/// Rewinds polygon rings to counter-clockwise exteriors so the geodesic
/// area is that of the shape and not of its complement.
fn oriented(geometry: Geometry<f64>) -> Geometry<f64> {
    match geometry {
        Geometry::Polygon(polygon) => Geometry::Polygon(polygon.orient(Direction::Default)),
        Geometry::MultiPolygon(polygons) => {
            Geometry::MultiPolygon(polygons.orient(Direction::Default))
        }
        other => other,
    }
}
