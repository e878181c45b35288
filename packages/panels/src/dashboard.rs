//! Chart series and KPIs derived from a completed analysis.
//!
//! The dashboard is only available once both DACB and change detection
//! results exist; risk and baseline are optional inputs.

use serde::Serialize;
use sylithe_analysis_models::{
    Baseline, ChangeResult, DacbResult, LeakageSeverity, RiskLevel, RiskResult,
};

use crate::color::ColorToken;
use crate::metric::MetricCard;
use crate::panel::{Panel, Section};

/// Classes shown in the land-use composition.
const LAND_USE_SLICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForestPoint {
    pub year: i32,
    pub expected_km2: f64,
    pub observed_km2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandUseSlice {
    pub name: String,
    pub area_km2: f64,
    pub percentage: f64,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditBar {
    pub name: &'static str,
    pub value_km2: f64,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneLoss {
    pub name: &'static str,
    pub deforestation_km2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskGauge {
    pub score: f64,
    pub level: Option<RiskLevel>,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsDashboard {
    /// Expected vs observed forest at the baseline and current year.
    pub forest_timeline: [ForestPoint; 2],
    pub land_use: Vec<LandUseSlice>,
    /// Gross credits, leakage adjustment (negative), net credits.
    pub credit_flow: [CreditBar; 3],
    pub leakage_comparison: [ZoneLoss; 2],
    pub leakage_ratio: f64,
    pub leakage_severity: LeakageSeverity,
    pub adjustment_factor: f64,
    pub risk: RiskGauge,
    pub kpis: Vec<MetricCard>,
}

impl AnalyticsDashboard {
    /// Derives every series. Returns `None` unless both DACB and change
    /// results are present.
    #[must_use]
    pub fn build(
        dacb: Option<&DacbResult>,
        change: Option<&ChangeResult>,
        risk: Option<&RiskResult>,
        baseline: Option<&Baseline>,
    ) -> Option<Self> {
        let (dacb, change) = (dacb?, change?);
        let baseline_year = baseline.map_or(dacb.baseline_year, |b| b.baseline_year);

        let land_use = change
            .changes_by_class()
            .into_iter()
            .take(LAND_USE_SLICES)
            .enumerate()
            .map(|(i, (_, class))| LandUseSlice {
                name: class.class_name.clone(),
                area_km2: class.current_km2,
                percentage: class.current_pct,
                color: ColorToken::chart(i),
            })
            .collect();

        let gross = dacb.avoided_deforestation_km2;
        let level = risk.map(|r| r.risk_level);

        Some(Self {
            forest_timeline: [
                ForestPoint {
                    year: baseline_year,
                    expected_km2: dacb.project_forest_baseline_km2,
                    observed_km2: dacb.project_forest_baseline_km2,
                },
                ForestPoint {
                    year: dacb.current_year,
                    expected_km2: dacb.expected_forest_km2,
                    observed_km2: dacb.observed_forest_km2,
                },
            ],
            land_use,
            credit_flow: [
                CreditBar {
                    name: "Gross Credits",
                    value_km2: gross,
                    color: ColorToken::Lime,
                },
                CreditBar {
                    name: "Leakage Adj",
                    value_km2: -dacb.leakage_deduction_km2(),
                    color: ColorToken::Amber,
                },
                CreditBar {
                    name: "Net Credits",
                    value_km2: dacb.adjusted_avoided_deforestation_km2,
                    color: ColorToken::Emerald,
                },
            ],
            leakage_comparison: [
                ZoneLoss {
                    name: "Project Area",
                    deforestation_km2: dacb.project_forest_loss_km2(),
                },
                ZoneLoss {
                    name: "Buffer Zone",
                    deforestation_km2: dacb.control_forest_loss_km2(),
                },
            ],
            leakage_ratio: dacb.leakage_ratio,
            leakage_severity: dacb.leakage_severity,
            adjustment_factor: dacb.leakage_adjustment_factor,
            risk: RiskGauge {
                score: risk.map_or(0.0, |r| r.risk_score),
                level,
                color: match level {
                    Some(RiskLevel::Low) => ColorToken::Emerald,
                    Some(RiskLevel::Medium) => ColorToken::Amber,
                    _ => ColorToken::Red,
                },
            },
            kpis: vec![
                MetricCard::new("Avoided Deforestation", gross.to_string()).unit("km²"),
                MetricCard::new(
                    "Net Carbon Credits",
                    dacb.adjusted_avoided_deforestation_km2.to_string(),
                )
                .unit("km²"),
                MetricCard::new("Permanence Score", dacb.permanence_score.to_string()).unit("%"),
                MetricCard::new("Confidence Level", dacb.confidence.to_string())
                    .color(ColorToken::for_confidence(dacb.confidence)),
            ],
        })
    }

    #[must_use]
    pub fn panel(&self) -> Panel {
        let timeline = self.forest_timeline.iter().fold(
            Section::new("Forest Cover Timeline"),
            |section, point| {
                section.field(
                    point.year.to_string(),
                    format!(
                        "expected {:.2} km², observed {:.2} km²",
                        point.expected_km2, point.observed_km2
                    ),
                )
            },
        );

        let land_use = self
            .land_use
            .iter()
            .fold(Section::new("Land Use Distribution"), |section, slice| {
                section.bar(&slice.name, slice.percentage, slice.color)
            });

        let credits = self
            .credit_flow
            .iter()
            .fold(Section::new("Carbon Credit Flow"), |section, bar| {
                section.indicator(bar.name, format!("{:.2} km²", bar.value_km2), bar.color)
            });

        let risk = Section::new("Risk Assessment").indicator(
            "Overall Score",
            format!(
                "{} ({})",
                self.risk.score,
                self.risk
                    .level
                    .map_or_else(|| "N/A".to_string(), |l| l.to_string())
            ),
            self.risk.color,
        );

        let leakage = self
            .leakage_comparison
            .iter()
            .fold(Section::new("Leakage Analysis"), |section, zone| {
                section.field(zone.name, format!("{:.2} km² lost", zone.deforestation_km2))
            })
            .field(
                "Leakage Ratio",
                format!("{}x ({})", self.leakage_ratio, self.leakage_severity),
            )
            .field("Adjustment Factor", self.adjustment_factor.to_string());

        let kpis = self
            .kpis
            .iter()
            .fold(Section::new("Key Indicators"), |section, card| {
                section.push(card.to_item())
            });

        Panel::new(
            "Analytics",
            vec![timeline, land_use, credits, risk, leakage, kpis],
        )
    }
}

/// The dashboard panel, or its empty state.
#[must_use]
pub fn dashboard_panel(
    dacb: Option<&DacbResult>,
    change: Option<&ChangeResult>,
    risk: Option<&RiskResult>,
    baseline: Option<&Baseline>,
) -> Panel {
    AnalyticsDashboard::build(dacb, change, risk, baseline).map_or_else(
        || Panel::placeholder("No Analytics Data", "Run analysis to view charts and insights"),
        |dashboard| dashboard.panel(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dacb() -> DacbResult {
        serde_json::from_value(json!({
            "baseline_year": 2019,
            "current_year": 2023,
            "project_forest_baseline_km2": 10.0,
            "project_forest_current_km2": 9.5,
            "control_forest_baseline_km2": 40.0,
            "control_forest_current_km2": 36.0,
            "expected_forest_km2": 9.0,
            "observed_forest_km2": 9.5,
            "avoided_deforestation_km2": 0.5,
            "leakage_ratio": 1.1,
            "leakage_severity": "MEDIUM",
            "leakage_adjustment_factor": 0.8,
            "adjusted_avoided_deforestation_km2": 0.4,
            "permanence_score": 82.5,
            "control_area_quality": {"similarity_score": 0.85, "quality": "HIGH"},
            "confidence": "MEDIUM"
        }))
        .unwrap()
    }

    fn change() -> ChangeResult {
        let classes: serde_json::Map<String, serde_json::Value> = (0..7)
            .map(|id| {
                (
                    id.to_string(),
                    json!({"class_name": format!("Class {id}"), "current_km2": id, "current_pct": id * 10}),
                )
            })
            .collect();
        serde_json::from_value(json!({
            "baseline_year": 2019,
            "current_year": 2023,
            "changes": classes
        }))
        .unwrap()
    }

    #[test]
    fn empty_without_dacb_or_change() {
        assert!(AnalyticsDashboard::build(None, Some(&change()), None, None).is_none());
        assert!(AnalyticsDashboard::build(Some(&dacb()), None, None, None).is_none());
        assert_eq!(
            dashboard_panel(None, None, None, None).title,
            "No Analytics Data"
        );
    }

    #[test]
    fn credit_waterfall() {
        let dashboard = AnalyticsDashboard::build(Some(&dacb()), Some(&change()), None, None).unwrap();
        let [gross, leakage, net] = &dashboard.credit_flow;
        assert!((gross.value_km2 - 0.5).abs() < 1e-9);
        assert!((leakage.value_km2 + 0.1).abs() < 1e-9);
        assert!((net.value_km2 - 0.4).abs() < 1e-9);
    }

    #[test]
    fn land_use_takes_first_five_classes() {
        let dashboard = AnalyticsDashboard::build(Some(&dacb()), Some(&change()), None, None).unwrap();
        let names: Vec<_> = dashboard.land_use.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Class 0", "Class 1", "Class 2", "Class 3", "Class 4"]);
        assert_eq!(dashboard.land_use[1].color, ColorToken::Emerald);
    }

    #[test]
    fn forest_timeline_starts_at_baseline_year() {
        let baseline: Baseline =
            serde_json::from_value(json!({"baseline_id": "b1", "baseline_year": 2018})).unwrap();
        let dashboard =
            AnalyticsDashboard::build(Some(&dacb()), Some(&change()), None, Some(&baseline))
                .unwrap();
        assert_eq!(dashboard.forest_timeline[0].year, 2018);
        assert!((dashboard.forest_timeline[1].expected_km2 - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn risk_gauge_without_risk_defaults_to_zero() {
        let dashboard = AnalyticsDashboard::build(Some(&dacb()), Some(&change()), None, None).unwrap();
        assert!(dashboard.risk.level.is_none());
        assert_eq!(dashboard.risk.color, ColorToken::Red);

        let panel = dashboard.panel();
        assert!(panel.to_string().contains("0 (N/A)"));
        assert!(panel.section("Key Indicators").is_some());
    }

    #[test]
    fn zone_losses() {
        let dashboard = AnalyticsDashboard::build(Some(&dacb()), Some(&change()), None, None).unwrap();
        assert!((dashboard.leakage_comparison[0].deforestation_km2 - 0.5).abs() < 1e-9);
        assert!((dashboard.leakage_comparison[1].deforestation_km2 - 4.0).abs() < 1e-9);
    }
}
