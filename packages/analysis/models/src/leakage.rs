//! Leakage analysis comparing the project area to its surrounding buffer.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How strongly deforestation appears to have shifted into the buffer zone.
///
/// The backend reports `UNKNOWN` when the computation fails; any other
/// unrecognised value also maps to [`LeakageSeverity::Unknown`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum LeakageSeverity {
    None,
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Forest statistics for one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneStats {
    #[serde(default)]
    pub area_km2: f64,
    #[serde(default)]
    pub baseline_forest_pct: f64,
    #[serde(default)]
    pub current_forest_pct: f64,
    #[serde(default)]
    pub deforestation_pct: f64,
}

/// Response of `POST /api/leakage-analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeakageResult {
    pub leakage_detected: bool,
    #[serde(default)]
    pub leakage_severity: LeakageSeverity,
    #[serde(default)]
    pub leakage_ratio: f64,
    #[serde(default)]
    pub project_area: ZoneStats,
    #[serde(default)]
    pub buffer_zone: ZoneStats,
    #[serde(default)]
    pub buffer_km: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub buffer_tile_url: Option<String>,
}

impl LeakageResult {
    /// Buffer tile URL, treating the empty string sent on failure as absent.
    #[must_use]
    pub fn buffer_tile(&self) -> Option<&str> {
        self.buffer_tile_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_detected_leakage() {
        let json = r#"{
            "leakage_detected": true,
            "leakage_severity": "HIGH",
            "leakage_ratio": 2.35,
            "buffer_km": 5,
            "buffer_tile_url": "https://tiles/buffer/{z}/{x}/{y}",
            "project_area": {"baseline_forest_pct": 60, "current_forest_pct": 58, "deforestation_pct": 2, "area_km2": 10},
            "buffer_zone": {"baseline_forest_pct": 55, "current_forest_pct": 50.3, "deforestation_pct": 4.7, "area_km2": 95},
            "summary": "Leakage detected",
            "recommendation": "Consider expanding monitoring to buffer zone"
        }"#;
        let leakage: LeakageResult = serde_json::from_str(json).unwrap();
        assert_eq!(leakage.leakage_severity, LeakageSeverity::High);
        assert!((leakage.buffer_zone.deforestation_pct - 4.7).abs() < f64::EPSILON);
        assert!(leakage.buffer_tile().is_some());
    }

    #[test]
    fn failed_analysis_has_no_buffer_tile() {
        let json = r#"{"leakage_detected": false, "leakage_severity": "UNKNOWN", "buffer_tile_url": ""}"#;
        let leakage: LeakageResult = serde_json::from_str(json).unwrap();
        assert_eq!(leakage.leakage_severity, LeakageSeverity::Unknown);
        assert_eq!(leakage.buffer_tile(), None);
    }

    #[test]
    fn unrecognised_severity_is_unknown() {
        let json = r#"{"leakage_detected": true, "leakage_severity": "EXTREME"}"#;
        let leakage: LeakageResult = serde_json::from_str(json).unwrap();
        assert_eq!(leakage.leakage_severity, LeakageSeverity::Unknown);
    }
}
