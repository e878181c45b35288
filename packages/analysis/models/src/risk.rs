//! Carbon permanence and reversal risk assessment.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Overall risk band, also used as the severity of individual flags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// A single risk finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFlag {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: RiskLevel,
    #[serde(default)]
    pub score_impact: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub recommendation: String,
}

impl RiskFlag {
    /// Flag type with underscores shown as spaces (`FOREST_LOSS` →
    /// `FOREST LOSS`).
    #[must_use]
    pub fn kind_label(&self) -> String {
        self.kind.replace('_', " ")
    }
}

/// Executive verdict attached to a risk assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    #[serde(default)]
    pub verdict: String,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub action: String,
}

/// Response of `POST /api/risk-assessment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub permanence_confidence: f64,
    #[serde(default)]
    pub flags: Vec<RiskFlag>,
    #[serde(default)]
    pub total_flags: usize,
    #[serde(default)]
    pub critical_flags: usize,
    #[serde(default)]
    pub high_flags: usize,
    #[serde(default)]
    pub summary: Option<RiskSummary>,
}
