//! Colour tokens used by every panel.

use serde::{Serialize, Serializer};
use strum_macros::{AsRefStr, Display};
use sylithe_analysis_models::{ConfidenceLevel, LeakageSeverity, LulcClass, RiskLevel};

/// A named colour. Serializes as its hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ColorToken {
    Red,
    DeepRed,
    Amber,
    Yellow,
    Green,
    Emerald,
    Lime,
    Blue,
    Violet,
    Slate,
    Gray,
    /// The class colour of a land-cover class.
    #[strum(to_string = "lulc")]
    Lulc(LulcClass),
}

/// Chart series colours, cycled by index.
pub const CHART_PALETTE: [ColorToken; 6] = [
    ColorToken::Lime,
    ColorToken::Emerald,
    ColorToken::Blue,
    ColorToken::Amber,
    ColorToken::Red,
    ColorToken::Violet,
];

impl ColorToken {
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#ef4444",
            Self::DeepRed => "#dc2626",
            Self::Amber => "#f59e0b",
            Self::Yellow => "#eab308",
            Self::Green => "#22c55e",
            Self::Emerald => "#10b981",
            Self::Lime => "#84cc16",
            Self::Blue => "#3b82f6",
            Self::Violet => "#8b5cf6",
            Self::Slate => "#94a3b8",
            Self::Gray => "#6b7280",
            Self::Lulc(class) => class.color(),
        }
    }

    /// CRITICAL red, HIGH amber, MEDIUM yellow, LOW green.
    #[must_use]
    pub const fn for_risk(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Critical => Self::Red,
            RiskLevel::High => Self::Amber,
            RiskLevel::Medium => Self::Yellow,
            RiskLevel::Low => Self::Green,
        }
    }

    #[must_use]
    pub const fn for_leakage(severity: LeakageSeverity) -> Self {
        match severity {
            LeakageSeverity::High => Self::DeepRed,
            LeakageSeverity::Medium => Self::Amber,
            LeakageSeverity::Low => Self::Emerald,
            LeakageSeverity::None | LeakageSeverity::Unknown => Self::Gray,
        }
    }

    #[must_use]
    pub const fn for_confidence(level: ConfidenceLevel) -> Self {
        match level {
            ConfidenceLevel::High => Self::Lime,
            ConfidenceLevel::Medium => Self::Amber,
            ConfidenceLevel::Low => Self::Red,
        }
    }

    /// Positive green, negative red, zero slate.
    #[must_use]
    pub fn for_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Green
        } else if change < 0.0 {
            Self::Red
        } else {
            Self::Slate
        }
    }

    /// Bar colour for a 0-100 confidence percentage.
    #[must_use]
    pub fn for_percentage(pct: f64, good_above: f64, fair_above: f64) -> Self {
        if pct > good_above {
            Self::Green
        } else if pct > fair_above {
            Self::Amber
        } else {
            Self::Red
        }
    }

    #[must_use]
    pub const fn chart(index: usize) -> Self {
        CHART_PALETTE[index % CHART_PALETTE.len()]
    }
}

impl Serialize for ColorToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}
