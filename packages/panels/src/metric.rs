use std::fmt;

use serde::Serialize;

use crate::color::ColorToken;
use crate::panel::Item;

/// A single KPI with an optional trend arrow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub unit: Option<String>,
    /// Percent change; zero shows no arrow.
    pub trend: Option<f64>,
    pub color: ColorToken,
}

impl MetricCard {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit: None,
            trend: None,
            color: ColorToken::Lime,
        }
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn trend(mut self, trend: f64) -> Self {
        self.trend = Some(trend);
        self
    }

    #[must_use]
    pub fn color(mut self, color: ColorToken) -> Self {
        self.color = color;
        self
    }

    /// `↑ 4.2%` in emerald or `↓ 1.5%` in red.
    #[must_use]
    pub fn trend_indicator(&self) -> Option<(String, ColorToken)> {
        let trend = self.trend.filter(|t| t.abs() > f64::EPSILON)?;
        Some(if trend > 0.0 {
            (format!("↑ {trend}%"), ColorToken::Emerald)
        } else {
            (format!("↓ {}%", trend.abs()), ColorToken::Red)
        })
    }

    #[must_use]
    pub fn display_value(&self) -> String {
        self.unit.as_ref().map_or_else(
            || self.value.clone(),
            |unit| format!("{} {unit}", self.value),
        )
    }

    #[must_use]
    pub fn to_item(&self) -> Item {
        Item::Indicator {
            label: self.label.clone(),
            text: self.to_string(),
            color: self.color,
        }
    }
}

impl fmt::Display for MetricCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_value())?;
        if let Some((trend, _)) = self.trend_indicator() {
            write!(f, " ({trend})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_direction_and_colour() {
        let up = MetricCard::new("Avoided", "0.5").unit("km²").trend(4.2);
        assert_eq!(
            up.trend_indicator(),
            Some(("↑ 4.2%".to_string(), ColorToken::Emerald))
        );
        assert_eq!(up.to_string(), "0.5 km² (↑ 4.2%)");

        let down = MetricCard::new("Forest", "9.5").trend(-1.5);
        assert_eq!(
            down.trend_indicator(),
            Some(("↓ 1.5%".to_string(), ColorToken::Red))
        );
    }

    #[test]
    fn zero_trend_has_no_arrow() {
        let card = MetricCard::new("Score", "82.5").unit("%").trend(0.0);
        assert!(card.trend_indicator().is_none());
        assert_eq!(card.to_string(), "82.5 %");
    }
}
