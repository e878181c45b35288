use sylithe_analysis_models::RiskResult;

use crate::color::ColorToken;
use crate::panel::{Panel, Section};

/// Risk badge, permanence bar, verdict and flags.
#[must_use]
pub fn risk_panel(risk: Option<&RiskResult>) -> Panel {
    let Some(risk) = risk else {
        return Panel::placeholder(
            "Risk Assessment",
            "Complete change detection to see carbon risk analysis",
        );
    };

    let mut sections = vec![
        Section::untitled()
            .badge(
                format!("{} RISK", risk.risk_level),
                ColorToken::for_risk(risk.risk_level),
            )
            .field("Risk Score", format!("{}/100", risk.risk_score))
            .bar(
                "Permanence Confidence",
                risk.permanence_confidence,
                ColorToken::for_percentage(risk.permanence_confidence, 70.0, 40.0),
            ),
    ];

    if let Some(summary) = &risk.summary {
        sections.push(
            Section::new("Verdict")
                .text(&summary.verdict)
                .text(&summary.message)
                .field("Action", &summary.action),
        );
    }

    if !risk.flags.is_empty() {
        sections.push(risk.flags.iter().fold(
            Section::new(format!("Risk Flags ({})", risk.flags.len())),
            |section, flag| {
                section
                    .indicator(
                        flag.kind_label(),
                        flag.severity.to_string(),
                        ColorToken::for_risk(flag.severity),
                    )
                    .text(&flag.reason)
                    .text(&flag.explanation)
                    .text(format!("→ {}", flag.recommendation))
            },
        ));
    }

    Panel::new("Carbon Risk Assessment", sections)
}
