use sylithe_analysis_models::ChmResult;

use crate::color::ColorToken;
use crate::panel::{Panel, Section};

pub const MODEL_NAME: &str = "Sylithe CHM v1";

/// Years offered by the canopy-height year picker.
pub const CHM_YEARS: [i32; 7] = [2019, 2020, 2021, 2022, 2023, 2024, 2025];

/// Canopy-height key metrics with the run control.
#[must_use]
pub fn chm_panel(
    result: Option<&ChmResult>,
    error: Option<&str>,
    has_polygon: bool,
    analyzing: bool,
) -> Panel {
    let run = Section::untitled().button(
        if analyzing {
            "Processing CHM @10m..."
        } else {
            "Submit Analysis"
        },
        has_polygon && !analyzing,
    );

    let mut sections = vec![run];
    if let Some(error) = error {
        sections.push(
            Section::untitled()
                .badge("ERROR", ColorToken::Red)
                .text(error),
        );
    }

    let Some(result) = result else {
        sections.push(Section::untitled().text("Draw a polygon → select year → run analysis"));
        return Panel::new("CHM Analysis", sections);
    };

    let height = &result.model_prediction;
    sections.push(
        Section::new(format!("Height Summary ({})", result.year))
            .field("Min", format!("{:.2} m", height.min))
            .field("Avg", format!("{:.2} m", height.avg))
            .field("Max", format!("{:.2} m", height.max))
            .field("Std Dev", format!("{:.2} m", height.std)),
    );

    let eligibility = &result.eligibility;
    let breakdown = &eligibility.breakdown;
    sections.push(
        Section::new("Eligibility")
            .field("Total Area", format!("{:.2} ha", result.total_area_ha))
            .bar(
                "Eligible",
                eligibility.percentage,
                ColorToken::for_percentage(eligibility.percentage, 70.0, 40.0),
            )
            .field("Eligible Area", format!("{:.2} ha", eligibility.eligible_ha))
            .field(
                "Ineligible Area",
                format!("{:.2} ha", eligibility.ineligible_ha),
            )
            .field("Trees", format!("{:.2} ha", breakdown.trees))
            .field("Mangroves", format!("{:.2} ha", breakdown.mangroves))
            .field("Urban", format!("{:.2} ha", breakdown.urban))
            .field("Water", format!("{:.2} ha", breakdown.water))
            .field("Other", format!("{:.2} ha", breakdown.other)),
    );

    sections.push(
        Section::new("Tree Count")
            .field("Total", result.tree_count.total.to_string())
            .field("Per Hectare", result.tree_count.per_hectare.to_string())
            .field("Model", MODEL_NAME),
    );

    Panel::new("CHM Analysis", sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ChmResult {
        serde_json::from_value(serde_json::json!({
            "status": "success",
            "year": 2023,
            "total_area_ha": 100.0,
            "model_prediction": {"avg": 14.234, "min": 0.5, "max": 38.7, "std": 6.1},
            "eligibility": {"percentage": 72.4, "eligible_ha": 72.4, "ineligible_ha": 27.6,
                            "breakdown": {"trees": 70.1, "mangroves": 2.3}},
            "tree_count": {"total": 28960, "per_hectare": 400}
        }))
        .unwrap()
    }

    #[test]
    fn run_button_needs_polygon() {
        let panel = chm_panel(None, None, false, false);
        assert_eq!(panel.button("Submit Analysis"), Some(false));
        let panel = chm_panel(None, None, true, false);
        assert_eq!(panel.button("Submit Analysis"), Some(true));
    }

    #[test]
    fn metrics_are_formatted() {
        let panel = chm_panel(Some(&result()), None, true, false);
        assert!(panel.section("Height Summary (2023)").is_some());
        assert_eq!(panel.field("Avg"), Some("14.23 m"));
        assert_eq!(panel.field("Total"), Some("28960"));
        assert_eq!(panel.field("Model"), Some(MODEL_NAME));
    }

    #[test]
    fn old_result_stays_visible_while_processing() {
        let panel = chm_panel(Some(&result()), None, true, true);
        assert_eq!(panel.button("Processing CHM @10m..."), Some(false));
        assert!(panel.section("Eligibility").is_some());
    }

    #[test]
    fn error_message_is_shown() {
        let panel = chm_panel(None, Some("GEE Engine Error"), true, false);
        assert_eq!(panel.badge(), Some(("ERROR", ColorToken::Red)));
        assert!(panel.to_string().contains("GEE Engine Error"));
    }
}
