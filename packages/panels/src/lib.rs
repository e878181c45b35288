#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation panels for Sylithe analysis results.
//!
//! Each panel function takes optional result data and returns a [`Panel`]:
//! a plain tree of titled sections and items (fields, badges, bars,
//! buttons). A missing result yields a placeholder panel instead of an
//! error. Panels carry no rendering logic beyond a plain-text
//! [`Display`](std::fmt::Display) and serialize to JSON, so the CLI, the
//! server, or any other front end can draw them.

pub mod baseline;
pub mod change;
pub mod chm;
pub mod color;
pub mod dacb;
pub mod dashboard;
pub mod leakage;
pub mod metric;
pub mod panel;
pub mod risk;
pub mod stats;

pub use baseline::{DEFAULT_BASELINE_YEAR, baseline_panel};
pub use change::change_panel;
pub use chm::{CHM_YEARS, MODEL_NAME, chm_panel};
pub use color::{CHART_PALETTE, ColorToken};
pub use dacb::{DacbTab, dacb_panel};
pub use dashboard::{AnalyticsDashboard, dashboard_panel};
pub use leakage::leakage_panel;
pub use metric::MetricCard;
pub use panel::{Item, Panel, PanelBody, Section, arrow_pct};
pub use risk::risk_panel;
pub use stats::stats_panel;
