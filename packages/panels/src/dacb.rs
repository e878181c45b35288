//! Dynamic Area Control Baseline results, split over four tabs.

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use sylithe_analysis_models::{ConfidenceLevel, ControlSelection, DacbResult};

use crate::color::ColorToken;
use crate::panel::{Item, Panel, Section};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DacbTab {
    #[default]
    Baseline,
    Trends,
    Credits,
    Quality,
}

#[must_use]
pub fn dacb_panel(dacb: Option<&DacbResult>, tab: DacbTab) -> Panel {
    let Some(dacb) = dacb else {
        return Panel::placeholder(
            "DACB Analysis",
            "Configure baseline and current year, then run DACB analysis",
        );
    };

    let tabs = Section::untitled().push(Item::Tabs {
        labels: DacbTab::iter().map(|t| t.to_string()).collect(),
        active: DacbTab::iter().position(|t| t == tab).unwrap_or_default(),
    });

    let mut sections = vec![tabs];
    sections.extend(match tab {
        DacbTab::Baseline => baseline_tab(dacb),
        DacbTab::Trends => trends_tab(dacb),
        DacbTab::Credits => credits_tab(dacb),
        DacbTab::Quality => quality_tab(dacb),
    });

    Panel::new("DACB Results", sections)
}

fn baseline_tab(dacb: &DacbResult) -> Vec<Section> {
    vec![
        Section::untitled()
            .field("Baseline Model", &dacb.baseline_model)
            .field(
                "Period",
                format!(
                    "{} → {} ({} years)",
                    dacb.baseline_year, dacb.current_year, dacb.years_elapsed
                ),
            ),
        Section::new("Expected vs Observed")
            .indicator(
                "Expected (Baseline)",
                format!("{} km²", dacb.expected_forest_km2),
                ColorToken::Blue,
            )
            .indicator(
                "Observed (Actual)",
                format!("{} km²", dacb.observed_forest_km2),
                ColorToken::Lime,
            ),
        Section::untitled().field(
            "Control Trend",
            format!("{} km²/year forest loss", dacb.control_trend_km2_per_year),
        ),
    ]
}

fn trend(heading: String, baseline_km2: f64, current_km2: f64) -> Section {
    Section::new(heading)
        .field("Baseline", format!("{baseline_km2} km²"))
        .field("Current", format!("{current_km2} km²"))
        .indicator(
            "Change",
            format!("{:.2} km²", current_km2 - baseline_km2),
            ColorToken::for_change(current_km2 - baseline_km2),
        )
}

fn trends_tab(dacb: &DacbResult) -> Vec<Section> {
    vec![
        trend(
            "Project Area".to_string(),
            dacb.project_forest_baseline_km2,
            dacb.project_forest_current_km2,
        ),
        trend(
            format!("Control Area ({}km buffer)", dacb.buffer_km),
            dacb.control_forest_baseline_km2,
            dacb.control_forest_current_km2,
        ),
        Section::untitled().field(
            "Control Trend Rate",
            format!("{} km²/year", dacb.control_trend_km2_per_year),
        ),
    ]
}

fn credits_tab(dacb: &DacbResult) -> Vec<Section> {
    vec![
        Section::untitled().indicator(
            "Avoided Deforestation",
            format!("{} km²", dacb.avoided_deforestation_km2),
            ColorToken::Lime,
        ),
        Section::new("Leakage Adjustment")
            .field(
                "Leakage Ratio",
                format!("{}x ({})", dacb.leakage_ratio, dacb.leakage_severity),
            )
            .field(
                "Discount Factor (λ)",
                dacb.leakage_adjustment_factor.to_string(),
            ),
        Section::untitled()
            .field(
                "Adjusted Credits",
                format!("{} km²", dacb.adjusted_avoided_deforestation_km2),
            )
            .bar(
                "Permanence Confidence",
                dacb.permanence_score,
                ColorToken::for_percentage(dacb.permanence_score, 70.0, 50.0),
            )
            .badge(
                format!("Confidence: {}", dacb.confidence),
                ColorToken::for_confidence(dacb.confidence),
            ),
    ]
}

const fn quality_note(quality: ConfidenceLevel) -> &'static str {
    match quality {
        ConfidenceLevel::High => "Control area is highly representative of project area conditions.",
        ConfidenceLevel::Medium => {
            "Control area shows moderate similarity. Results are acceptable but may have some uncertainty."
        }
        ConfidenceLevel::Low => {
            "Control area similarity is low. Consider adjusting buffer size or using KNN selection."
        }
    }
}

fn quality_tab(dacb: &DacbResult) -> Vec<Section> {
    let quality = &dacb.control_area_quality;
    let mut sections = Vec::new();

    if let Some(ControlSelection::Knn {
        k_value,
        avg_similarity,
        ..
    }) = &dacb.control_selection
    {
        sections.push(
            Section::new("KNN-Selected Control Areas")
                .field("K", format!("{k_value} tiles"))
                .field("Avg Similarity", format!("{:.1}%", avg_similarity * 100.0)),
        );
    }

    let color = ColorToken::for_confidence(quality.quality);
    sections.push(
        Section::new("Control Area Quality")
            .badge(quality.quality.to_string(), color)
            .bar(
                "Similarity Score",
                (quality.similarity_score * 100.0).round(),
                color,
            )
            .field(
                "Project Forest Cover",
                format!("{}%", quality.project_forest_pct),
            )
            .field(
                "Control Forest Cover",
                format!("{}%", quality.control_forest_pct),
            )
            .field(
                "Difference",
                format!(
                    "{:.1}%",
                    (quality.project_forest_pct - quality.control_forest_pct).abs()
                ),
            )
            .text(quality_note(quality.quality)),
    );

    sections
}
