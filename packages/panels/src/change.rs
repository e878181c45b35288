use sylithe_analysis_models::ChangeResult;

use crate::color::ColorToken;
use crate::panel::{Panel, Section, arrow_pct};

/// Significant changes shown in the "Key Changes" section.
const KEY_CHANGES: usize = 3;

#[must_use]
pub fn change_panel(change: Option<&ChangeResult>) -> Panel {
    let Some(change) = change else {
        return Panel::placeholder(
            "Change Detection",
            "Create a baseline and select a comparison year to see changes",
        );
    };

    let mut sections = vec![Section::untitled().field(
        "Period",
        format!(
            "{} → {} ({} years)",
            change.baseline_year, change.current_year, change.years_elapsed
        ),
    )];

    let key_changes = change.summary.top(KEY_CHANGES);
    if !key_changes.is_empty() {
        sections.push(key_changes.iter().fold(
            Section::new("Key Changes"),
            |section, significant| {
                let section = section.indicator(
                    &significant.class_name,
                    arrow_pct(significant.change),
                    if significant.change > 0.0 {
                        ColorToken::Green
                    } else {
                        ColorToken::Red
                    },
                );
                if significant.summary.is_empty() {
                    section
                } else {
                    section.text(&significant.summary)
                }
            },
        ));
    }

    if !change.transitions.is_empty() {
        sections.push(change.transitions.values().fold(
            Section::new("Land Transitions"),
            |section, transition| {
                section.field(
                    format!("{} → {}", transition.from_class, transition.to_class),
                    format!("{} km²", transition.area_km2),
                )
            },
        ));
    }

    sections.push(change.changes_by_class().into_iter().fold(
        Section::new("All Classes"),
        |section, (_, class)| {
            section.indicator(
                &class.class_name,
                arrow_pct(class.change_pct),
                ColorToken::for_change(class.change_pct),
            )
        },
    ));

    Panel::new("Change Detection", sections)
}
