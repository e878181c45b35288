#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis result types for the Sylithe forest-carbon backend.
//!
//! Every type in this crate mirrors a JSON object returned by (or sent to)
//! the analysis service. The client deserializes responses straight into
//! these types and the workflow and presentation layers consume them
//! without further conversion. None of them are persisted: a value exists
//! after a successful request and is replaced by the next one.
//!
//! Fields the presentation layer does not strictly need are
//! `#[serde(default)]` so that slimmer backend responses still parse.

pub mod aoi;
pub mod baseline;
pub mod change;
pub mod chm;
pub mod dacb;
pub mod leakage;
pub mod lulc;
pub mod risk;

pub use aoi::{AoiError, AreaOfInterest};
pub use baseline::{Baseline, LockReceipt};
pub use change::{ChangeResult, ChangeSummary, ClassChange, SignificantChange, Transition};
pub use chm::{ChmEligibility, ChmResult, HeightStats, LandCoverBreakdown, TreeCount};
pub use dacb::{ConfidenceLevel, ControlAreaQuality, ControlSelection, DacbResult};
pub use leakage::{LeakageResult, LeakageSeverity, ZoneStats};
pub use lulc::{LulcClass, LulcResult, LulcStats, Timeline, TimelineYear};
pub use risk::{RiskFlag, RiskLevel, RiskResult, RiskSummary};
