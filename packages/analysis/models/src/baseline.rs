//! Locked-in reference classification for a project area.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::lulc::LulcStats;

/// A baseline as returned by `POST /api/baseline/create` and
/// `GET /api/baseline/{id}`.
///
/// Lock state is enforced by the backend; the client only reflects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub baseline_id: String,
    pub baseline_year: i32,
    #[serde(default)]
    pub area_km2: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub locked_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub tile_url: String,
    #[serde(default)]
    pub stats: LulcStats,
}

impl Baseline {
    /// Calendar date the baseline was locked, when the backend reported a
    /// parseable timestamp.
    #[must_use]
    pub fn locked_on(&self) -> Option<NaiveDate> {
        self.locked_at.as_deref().and_then(parse_timestamp)
    }

    /// Calendar date the baseline was created.
    #[must_use]
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Response of `POST /api/baseline/lock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub baseline_id: String,
    #[serde(default)]
    pub locked_at: Option<String>,
}

/// Accepts RFC 3339, naive ISO 8601 (`2024-01-02T03:04:05.123456`) and the
/// SQLite `2024-01-02 03:04:05` form.
fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}
