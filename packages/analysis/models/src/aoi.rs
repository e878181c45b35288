//! Area of interest captured from the map or imported from a file.

use std::str::FromStr;

use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading an area of interest.
#[derive(Debug, Error)]
pub enum AoiError {
    /// The text is not valid `GeoJSON`.
    #[error("Invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A user-drawn or imported `GeoJSON` shape.
///
/// Immutable once captured and replaced wholesale when the user draws a new
/// shape. The value is sent to the backend exactly as it was produced:
/// no self-intersection, winding or minimum-area checks are applied. It
/// serializes transparently as the underlying `GeoJSON` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaOfInterest(GeoJson);

impl AreaOfInterest {
    /// Wraps an already-parsed `GeoJSON` value.
    #[must_use]
    pub const fn new(geojson: GeoJson) -> Self {
        Self(geojson)
    }

    /// Parses `GeoJSON` text (a `Feature`, `FeatureCollection` or bare
    /// geometry).
    ///
    /// # Errors
    ///
    /// Returns [`AoiError::Parse`] if the text is not valid `GeoJSON`.
    pub fn parse(text: &str) -> Result<Self, AoiError> {
        Ok(Self(text.parse::<GeoJson>()?))
    }

    /// Returns the wrapped `GeoJSON` value.
    #[must_use]
    pub const fn as_geojson(&self) -> &GeoJson {
        &self.0
    }

    /// Consumes the wrapper and returns the `GeoJSON` value.
    #[must_use]
    pub fn into_geojson(self) -> GeoJson {
        self.0
    }

    /// Every geometry carried by the shape, in document order.
    #[must_use]
    pub fn geometries(&self) -> Vec<&geojson::Geometry> {
        match &self.0 {
            GeoJson::Geometry(geometry) => vec![geometry],
            GeoJson::Feature(feature) => feature.geometry.iter().collect(),
            GeoJson::FeatureCollection(collection) => collection
                .features
                .iter()
                .filter_map(|f| f.geometry.as_ref())
                .collect(),
        }
    }

    /// Top-level `GeoJSON` object type name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match &self.0 {
            GeoJson::Geometry(_) => "Geometry",
            GeoJson::Feature(_) => "Feature",
            GeoJson::FeatureCollection(_) => "FeatureCollection",
        }
    }
}

impl From<GeoJson> for AreaOfInterest {
    fn from(value: GeoJson) -> Self {
        Self(value)
    }
}

impl FromStr for AreaOfInterest {
    type Err = AoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
