//! Land-use / land-cover classification results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The nine Dynamic World land-cover classes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LulcClass {
    Water = 0,
    Trees = 1,
    Grass = 2,
    FloodedVegetation = 3,
    Crops = 4,
    ShrubAndScrub = 5,
    BuiltArea = 6,
    BareGround = 7,
    SnowAndIce = 8,
}

impl LulcClass {
    /// Returns all classes in id order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Water,
            Self::Trees,
            Self::Grass,
            Self::FloodedVegetation,
            Self::Crops,
            Self::ShrubAndScrub,
            Self::BuiltArea,
            Self::BareGround,
            Self::SnowAndIce,
        ]
    }

    /// Numeric class id used by the backend.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up a class by numeric id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Water),
            1 => Some(Self::Trees),
            2 => Some(Self::Grass),
            3 => Some(Self::FloodedVegetation),
            4 => Some(Self::Crops),
            5 => Some(Self::ShrubAndScrub),
            6 => Some(Self::BuiltArea),
            7 => Some(Self::BareGround),
            8 => Some(Self::SnowAndIce),
            _ => None,
        }
    }

    /// Looks up a class by the string key used in stats maps (`"0"`..`"8"`).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        key.trim().parse::<u8>().ok().and_then(Self::from_id)
    }

    /// Human-readable class name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Trees => "Trees",
            Self::Grass => "Grass",
            Self::FloodedVegetation => "Flooded Vegetation",
            Self::Crops => "Crops",
            Self::ShrubAndScrub => "Shrub & Scrub",
            Self::BuiltArea => "Built Area",
            Self::BareGround => "Bare Ground",
            Self::SnowAndIce => "Snow & Ice",
        }
    }

    /// Legend colour as `#RRGGBB`.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Water => "#419BDF",
            Self::Trees => "#397D49",
            Self::Grass => "#88B053",
            Self::FloodedVegetation => "#7A87C6",
            Self::Crops => "#E49635",
            Self::ShrubAndScrub => "#DFC35A",
            Self::BuiltArea => "#C4281B",
            Self::BareGround => "#A59B8F",
            Self::SnowAndIce => "#B39FE1",
        }
    }
}

/// Pixel counts keyed by class id string (`"0"`..`"8"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LulcStats(pub BTreeMap<String, f64>);

impl LulcStats {
    /// Sum of all pixel counts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Share of each class in percent, in key order. Unknown class keys are
    /// kept with `None` for the class. Returns an empty list when the total
    /// is zero.
    #[must_use]
    pub fn percentages(&self) -> Vec<(String, Option<LulcClass>, f64)> {
        let total = self.total();
        if total <= 0.0 {
            return Vec::new();
        }

        self.0
            .iter()
            .map(|(key, count)| (key.clone(), LulcClass::from_key(key), count / total * 100.0))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Response of `POST /api/lulc/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LulcResult {
    pub tile_url: String,
    #[serde(default)]
    pub stats: Option<LulcStats>,
    #[serde(default)]
    pub aoi_area_km2: f64,
}

/// One year of a multi-year classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineYear {
    pub year: i32,
    pub tile_url: String,
    #[serde(default)]
    pub stats: LulcStats,
}

/// Response of `POST /api/lulc/timeline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub timeline: Vec<TimelineYear>,
    #[serde(default)]
    pub aoi_area_km2: f64,
}

impl Timeline {
    /// Finds the entry for `year`.
    #[must_use]
    pub fn year(&self, year: i32) -> Option<&TimelineYear> {
        self.timeline.iter().find(|entry| entry.year == year)
    }

    /// The most recent year, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&TimelineYear> {
        self.timeline.iter().max_by_key(|entry| entry.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_ids_round_trip() {
        for class in LulcClass::all() {
            assert_eq!(LulcClass::from_id(class.id()), Some(*class));
        }
        assert_eq!(LulcClass::from_id(9), None);
    }

    #[test]
    fn class_lookup_from_stats_key() {
        assert_eq!(LulcClass::from_key("5"), Some(LulcClass::ShrubAndScrub));
        assert_eq!(LulcClass::ShrubAndScrub.name(), "Shrub & Scrub");
        assert_eq!(LulcClass::from_key("x"), None);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let json = r#"{"0": 25, "1": 50, "4": 25}"#;
        let stats: LulcStats = serde_json::from_str(json).unwrap();
        let shares = stats.percentages();

        assert_eq!(shares.len(), 3);
        assert_eq!(shares[1].1, Some(LulcClass::Trees));
        assert!((shares[1].2 - 50.0).abs() < f64::EPSILON);
        let sum: f64 = shares.iter().map(|(_, _, pct)| pct).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_stats_have_no_percentages() {
        assert!(LulcStats::default().percentages().is_empty());
    }

    #[test]
    fn parses_single_year_response_without_stats() {
        let json = r#"{"tile_url": "https://tiles/{z}/{x}/{y}", "aoi_area_km2": 3.5}"#;
        let result: LulcResult = serde_json::from_str(json).unwrap();
        assert!(result.stats.is_none());
        assert!((result.aoi_area_km2 - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn timeline_lookup() {
        let json = r#"{
            "timeline": [
                {"year": 2018, "tile_url": "a", "stats": {"1": 10}},
                {"year": 2023, "tile_url": "b", "stats": {"1": 8}}
            ],
            "aoi_area_km2": 1.0
        }"#;
        let timeline: Timeline = serde_json::from_str(json).unwrap();
        assert_eq!(timeline.year(2018).map(|y| y.tile_url.as_str()), Some("a"));
        assert_eq!(timeline.latest().map(|y| y.year), Some(2023));
        assert!(timeline.year(2020).is_none());
    }
}
