use sylithe_analysis_models::LulcStats;

use crate::color::ColorToken;
use crate::panel::{Panel, Section};

/// Land-cover composition of the current view.
///
/// `year` is shown in the title in timeline mode.
#[must_use]
pub fn stats_panel(stats: Option<&LulcStats>, area_km2: Option<f64>, year: Option<i32>) -> Panel {
    let Some(stats) = stats else {
        return Panel::placeholder("Results", "Draw a polygon to see analysis results");
    };

    let title = year.map_or_else(|| "Analysis Results".to_string(), |y| format!("Results ({y})"));
    let area = area_km2.map_or_else(|| "--".to_string(), |a| format!("{a:.2} km²"));

    let classes = stats
        .percentages()
        .into_iter()
        .fold(Section::new("Land Cover"), |section, (key, class, pct)| {
            let (label, color) = class.map_or((key, ColorToken::Slate), |class| {
                (class.name().to_string(), ColorToken::Lulc(class))
            });
            section.bar(label, (pct * 10.0).round() / 10.0, color)
        });

    Panel::new(
        title,
        vec![Section::untitled().field("Total Area", area), classes],
    )
}
