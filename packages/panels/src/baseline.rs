use sylithe_analysis_models::Baseline;

use crate::panel::{Item, Panel, Section};

/// Year preselected in the create form.
pub const DEFAULT_BASELINE_YEAR: i32 = 2019;

/// Baseline creation form, or the current baseline with its lock control.
///
/// `years` are the selectable baseline years; `loading` disables the
/// action button.
#[must_use]
pub fn baseline_panel(baseline: Option<&Baseline>, years: &[i32], loading: bool) -> Panel {
    let Some(baseline) = baseline else {
        let selected = years
            .iter()
            .find(|year| **year == DEFAULT_BASELINE_YEAR)
            .or_else(|| years.first())
            .map(ToString::to_string);
        let form = Section::untitled()
            .text("Select a baseline year to establish the reference point for change detection")
            .push(Item::Select {
                label: "Baseline Year".to_string(),
                options: years.iter().map(ToString::to_string).collect(),
                selected,
            })
            .button(
                if loading { "Creating..." } else { "Create Baseline" },
                !loading,
            );
        return Panel::new("Set Baseline", vec![form]);
    };

    let title = if baseline.locked {
        "Baseline (Locked)"
    } else {
        "Baseline"
    };

    let mut info = Section::untitled()
        .field("Year", baseline.baseline_year.to_string())
        .field("Area", format!("{:.2} km²", baseline.area_km2))
        .field(
            "Status",
            if baseline.locked { "Locked" } else { "Unlocked" },
        );

    if let Some(locked_at) = &baseline.locked_at {
        let date = baseline
            .locked_on()
            .map_or_else(|| locked_at.clone(), |d| d.format("%Y-%m-%d").to_string());
        info = info.field("Locked", date);
    }

    info = if baseline.locked {
        info.text("Baseline is permanently locked and cannot be modified")
    } else {
        info.button(
            if loading { "Locking..." } else { "Lock Baseline" },
            !loading,
        )
    };

    Panel::new(title, vec![info])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(locked: bool) -> Baseline {
        serde_json::from_value(serde_json::json!({
            "baseline_id": "b1",
            "baseline_year": 2019,
            "area_km2": 12.345,
            "locked": locked,
            "locked_at": if locked { Some("2024-02-01T09:00:00") } else { None }
        }))
        .unwrap()
    }

    #[test]
    fn fresh_baseline_shows_area_and_enabled_lock_button() {
        let panel = baseline_panel(Some(&baseline(false)), &[], false);
        assert_eq!(panel.title, "Baseline");
        assert_eq!(panel.field("Area"), Some("12.35 km²"));
        assert_eq!(panel.field("Status"), Some("Unlocked"));
        assert_eq!(panel.button("Lock Baseline"), Some(true));
        assert!(panel.to_string().contains("12.35 km²"));
    }

    #[test]
    fn locked_baseline_has_no_lock_button() {
        let panel = baseline_panel(Some(&baseline(true)), &[], false);
        assert_eq!(panel.title, "Baseline (Locked)");
        assert_eq!(panel.field("Locked"), Some("2024-02-01"));
        assert_eq!(panel.button("Lock Baseline"), None);
        assert!(panel.to_string().contains("permanently locked"));
    }

    #[test]
    fn loading_disables_lock() {
        let panel = baseline_panel(Some(&baseline(false)), &[], true);
        assert_eq!(panel.button("Locking..."), Some(false));
    }

    #[test]
    fn absent_baseline_shows_create_form() {
        let years: Vec<i32> = (2018..=2023).collect();
        let panel = baseline_panel(None, &years, false);
        assert_eq!(panel.title, "Set Baseline");
        assert_eq!(panel.button("Create Baseline"), Some(true));
        assert!(panel.items().any(|item| matches!(
            item,
            Item::Select { options, selected: Some(selected), .. }
                if options.len() == 6 && selected == "2019"
        )));
    }
}
