//! Change detection between a baseline year and a later year.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lulc::LulcClass;

/// Per-class change, keyed in [`ChangeResult::changes`] by class id string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassChange {
    #[serde(default)]
    pub class_id: Option<u8>,
    pub class_name: String,
    #[serde(default)]
    pub baseline_pct: f64,
    #[serde(default)]
    pub current_pct: f64,
    #[serde(default)]
    pub baseline_km2: f64,
    #[serde(default)]
    pub current_km2: f64,
    #[serde(default)]
    pub change_km2: f64,
    #[serde(default)]
    pub change_pct: f64,
    #[serde(default)]
    pub summary: String,
}

impl ClassChange {
    /// The Dynamic World class, if the id is known.
    #[must_use]
    pub fn class(&self) -> Option<LulcClass> {
        self.class_id.and_then(LulcClass::from_id)
    }
}

/// Estimated conversion from one class to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from_class: String,
    pub to_class: String,
    #[serde(default)]
    pub area_km2: f64,
    #[serde(default)]
    pub description: String,
}

/// One entry of [`ChangeSummary::significant_changes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantChange {
    #[serde(rename = "class")]
    pub class_name: String,
    pub change: f64,
    #[serde(default)]
    pub summary: String,
}

/// Executive summary; significant changes arrive sorted by absolute change,
/// largest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    #[serde(default)]
    pub baseline_year: Option<i32>,
    #[serde(default)]
    pub current_year: Option<i32>,
    #[serde(default)]
    pub years_elapsed: Option<i32>,
    #[serde(default)]
    pub significant_changes: Vec<SignificantChange>,
    #[serde(default)]
    pub total_classes_changed: usize,
}

impl ChangeSummary {
    /// The `n` largest significant changes.
    #[must_use]
    pub fn top(&self, n: usize) -> &[SignificantChange] {
        &self.significant_changes[..self.significant_changes.len().min(n)]
    }
}

/// Response of `POST /api/change-detection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeResult {
    pub baseline_year: i32,
    pub current_year: i32,
    #[serde(default)]
    pub years_elapsed: i32,
    #[serde(default)]
    pub changes: BTreeMap<String, ClassChange>,
    #[serde(default)]
    pub transitions: BTreeMap<String, Transition>,
    #[serde(default)]
    pub summary: ChangeSummary,
    #[serde(default)]
    pub current_tile_url: Option<String>,
}

impl ChangeResult {
    /// Class changes ordered by numeric class id (`"10"` after `"9"`), with
    /// non-numeric keys last.
    #[must_use]
    pub fn changes_by_class(&self) -> Vec<(&str, &ClassChange)> {
        let mut entries: Vec<_> = self
            .changes
            .iter()
            .map(|(key, change)| (key.as_str(), change))
            .collect();
        entries.sort_by_key(|(key, _)| key.parse::<u32>().unwrap_or(u32::MAX));
        entries
    }

    /// Change for a given class, looked up by its id key.
    #[must_use]
    pub fn change_for(&self, class: LulcClass) -> Option<&ClassChange> {
        self.changes.get(&class.id().to_string())
    }
}
