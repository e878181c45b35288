use sylithe_analysis_models::{LeakageResult, ZoneStats};

use crate::color::ColorToken;
use crate::panel::{Panel, Section};

fn zone(heading: String, stats: &ZoneStats, accent: ColorToken) -> Section {
    Section::new(heading)
        .field("Area", format!("{} km²", stats.area_km2))
        .field("Baseline", format!("{}% forest", stats.baseline_forest_pct))
        .field("Current", format!("{}% forest", stats.current_forest_pct))
        .indicator("Loss", format!("{}%", stats.deforestation_pct), accent)
}

/// Leakage verdict with project vs buffer zone comparison.
///
/// Severity and ratio only appear when leakage was detected.
#[must_use]
pub fn leakage_panel(leakage: Option<&LeakageResult>) -> Panel {
    let Some(leakage) = leakage else {
        return Panel::placeholder(
            "Leakage Analysis",
            "Run change detection to analyse leakage into the buffer zone",
        );
    };

    let mut status = if leakage.leakage_detected {
        Section::untitled()
            .badge("LEAKAGE DETECTED", ColorToken::DeepRed)
            .indicator(
                "Severity",
                format!(
                    "{} | Ratio: {}x",
                    leakage.leakage_severity, leakage.leakage_ratio
                ),
                ColorToken::for_leakage(leakage.leakage_severity),
            )
    } else {
        Section::untitled().badge("NO LEAKAGE", ColorToken::Lime)
    };
    if !leakage.summary.is_empty() {
        status = status.text(&leakage.summary);
    }

    Panel::new(
        "Leakage Analysis",
        vec![
            status,
            zone(
                "Project Area".to_string(),
                &leakage.project_area,
                ColorToken::DeepRed,
            ),
            zone(
                format!("Buffer Zone ({}km)", leakage.buffer_km),
                &leakage.buffer_zone,
                ColorToken::DeepRed,
            ),
            Section::untitled().field("Recommendation", &leakage.recommendation),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leakage(detected: bool) -> LeakageResult {
        serde_json::from_value(serde_json::json!({
            "leakage_detected": detected,
            "leakage_severity": if detected { "HIGH" } else { "NONE" },
            "leakage_ratio": if detected { 1.8 } else { 0.2 },
            "project_area": {"area_km2": 12.3, "baseline_forest_pct": 60, "current_forest_pct": 55, "deforestation_pct": 5},
            "buffer_zone": {"area_km2": 80.1, "baseline_forest_pct": 48, "current_forest_pct": 40, "deforestation_pct": 8},
            "buffer_km": 5,
            "summary": "Summary text",
            "recommendation": "Keep monitoring"
        }))
        .unwrap()
    }

    #[test]
    fn no_leakage_hides_severity_and_ratio() {
        let panel = leakage_panel(Some(&leakage(false)));
        assert_eq!(panel.badge(), Some(("NO LEAKAGE", ColorToken::Lime)));

        let text = panel.to_string();
        assert!(!text.contains("Severity"));
        assert!(!text.contains("Ratio"));
    }

    #[test]
    fn detected_leakage_shows_severity_and_ratio() {
        let panel = leakage_panel(Some(&leakage(true)));
        assert_eq!(panel.badge(), Some(("LEAKAGE DETECTED", ColorToken::DeepRed)));
        assert!(panel.to_string().contains("Severity  HIGH | Ratio: 1.8x"));
    }

    #[test]
    fn zones_are_compared() {
        let panel = leakage_panel(Some(&leakage(true)));
        let buffer = panel.section("Buffer Zone (5km)").unwrap();
        assert_eq!(buffer.items.len(), 4);
        assert_eq!(panel.field("Recommendation"), Some("Keep monitoring"));
    }
}
