//! Dynamic Area Control Baseline (DACB) crediting results.
//!
//! DACB compares forest change in the project area against a control area
//! selected either as a ring buffer or by KNN similarity, then derives
//! avoided deforestation, a leakage adjustment and a permanence score.

use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::aoi::AreaOfInterest;
use crate::leakage::LeakageSeverity;

/// Confidence in a DACB result or in the control area's similarity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// How similar the control area is to the project area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlAreaQuality {
    #[serde(default)]
    pub similarity_score: f64,
    pub quality: ConfidenceLevel,
    #[serde(default)]
    pub project_forest_pct: f64,
    #[serde(default)]
    pub control_forest_pct: f64,
}

/// How the control area was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlSelection {
    /// Nearest-neighbour tiles matched on forest features.
    Knn {
        k_value: u32,
        #[serde(default)]
        features: Vec<String>,
        #[serde(default)]
        selected_tiles: Vec<String>,
        #[serde(default)]
        avg_similarity: f64,
    },
    /// A ring buffer around the project area.
    Buffer { buffer_km: f64 },
}

impl ControlSelection {
    /// Short method label (`KNN` or `BUFFER`).
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Knn { .. } => "KNN",
            Self::Buffer { .. } => "BUFFER",
        }
    }
}

/// Response of `POST /api/dacb/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DacbResult {
    #[serde(default)]
    pub baseline_model: String,
    pub baseline_year: i32,
    pub current_year: i32,
    #[serde(default)]
    pub years_elapsed: i32,
    #[serde(default)]
    pub buffer_km: f64,
    #[serde(default)]
    pub project_tile_url: Option<String>,
    #[serde(default)]
    pub control_tile_url: Option<String>,
    #[serde(default)]
    pub control_geojson: Option<serde_json::Value>,
    pub project_forest_baseline_km2: f64,
    pub project_forest_current_km2: f64,
    pub control_forest_baseline_km2: f64,
    pub control_forest_current_km2: f64,
    #[serde(default)]
    pub control_trend_km2_per_year: f64,
    pub expected_forest_km2: f64,
    pub observed_forest_km2: f64,
    pub avoided_deforestation_km2: f64,
    #[serde(default)]
    pub leakage_ratio: f64,
    #[serde(default)]
    pub leakage_severity: LeakageSeverity,
    #[serde(default = "full_credit")]
    pub leakage_adjustment_factor: f64,
    pub adjusted_avoided_deforestation_km2: f64,
    #[serde(default)]
    pub permanence_score: f64,
    pub control_area_quality: ControlAreaQuality,
    pub confidence: ConfidenceLevel,
    #[serde(default)]
    pub control_selection: Option<ControlSelection>,
}

const fn full_credit() -> f64 {
    1.0
}

impl DacbResult {
    /// Credits removed by the leakage adjustment.
    #[must_use]
    pub fn leakage_deduction_km2(&self) -> f64 {
        self.avoided_deforestation_km2 - self.adjusted_avoided_deforestation_km2
    }

    /// Forest lost in the project area between the two years.
    #[must_use]
    pub fn project_forest_loss_km2(&self) -> f64 {
        self.project_forest_baseline_km2 - self.project_forest_current_km2
    }

    /// Forest lost in the control area between the two years.
    #[must_use]
    pub fn control_forest_loss_km2(&self) -> f64 {
        self.control_forest_baseline_km2 - self.control_forest_current_km2
    }

    /// The control area geometry, when the backend sent valid `GeoJSON`.
    #[must_use]
    pub fn control_area(&self) -> Option<AreaOfInterest> {
        self.control_geojson
            .clone()
            .and_then(|value| GeoJson::from_json_value(value).ok())
            .map(AreaOfInterest::new)
    }
}
