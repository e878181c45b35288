//! Workflow defaults, optionally loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::WorkflowError;

/// Tunables for the analysis workflow. Every field is optional in TOML.
///
/// ```toml
/// default_year = 2023
/// buffer_km = 10
/// use_knn = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Year analysed when a new shape is drawn in single-year mode.
    pub default_year: i32,
    pub timeline_start_year: i32,
    pub timeline_end_year: i32,
    /// Years offered when creating a baseline.
    pub baseline_years: Vec<i32>,
    /// Years offered for change detection; only those after the baseline
    /// year are selectable.
    pub comparison_years: Vec<i32>,
    /// Control buffer width for DACB.
    pub buffer_km: f64,
    /// Select the DACB control area by KNN similarity instead of a buffer.
    pub use_knn: bool,
    /// Recorded by the backend as the baseline's locker.
    pub locked_by: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_year: 2023,
            timeline_start_year: 2018,
            timeline_end_year: 2023,
            baseline_years: (2018..=2023).collect(),
            comparison_years: (2020..=2023).collect(),
            buffer_km: 5.0,
            use_knn: false,
            locked_by: "user".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Parses TOML, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Config`] if the TOML is malformed or the
    /// timeline range is inverted.
    pub fn from_toml_str(text: &str) -> Result<Self, WorkflowError> {
        let config: Self = toml::from_str(text).map_err(|e| WorkflowError::Config {
            message: e.to_string(),
        })?;

        if config.timeline_start_year > config.timeline_end_year {
            return Err(WorkflowError::Config {
                message: format!(
                    "timeline_start_year {} is after timeline_end_year {}",
                    config.timeline_start_year, config.timeline_end_year
                ),
            });
        }

        Ok(config)
    }

    /// Loads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Config`] if the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| WorkflowError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded analysis config from {}", path.display());
        Ok(config)
    }

    /// Comparison years strictly after `baseline_year`.
    #[must_use]
    pub fn comparison_years_after(&self, baseline_year: i32) -> Vec<i32> {
        self.comparison_years
            .iter()
            .copied()
            .filter(|year| *year > baseline_year)
            .collect()
    }
}
