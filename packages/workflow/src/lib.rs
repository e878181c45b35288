#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis workflow for a single user session.
//!
//! Owns the progression from a drawn area of interest through LULC
//! classification, baseline creation and locking, to the dependent
//! change / risk / leakage / DACB pipeline. The canopy-height flow lives in
//! [`chm`] and shares nothing with the main workflow.

pub mod chm;
pub mod config;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod state;

#[cfg(test)]
mod mock;

pub use chm::{ChmSession, ChmSnapshot};
pub use config::AnalysisConfig;
pub use orchestrator::Orchestrator;
pub use pipeline::{PipelineOutcome, Stage, StageFailure};
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use session::{Handler, LulcMode, LulcView, WorkflowSnapshot};
pub use state::{Analysis, TransitionError, WorkflowState};

use sylithe_client::ClientError;
use thiserror::Error;

/// Errors from workflow handlers.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A precondition for the requested step is not met.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// A backend call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Change detection needs a year after the baseline year.
    #[error("Comparison year {year} must be after baseline year {baseline_year}")]
    InvalidYear { year: i32, baseline_year: i32 },

    /// The same handler is already running for this area of interest.
    #[error("{handler} is already running")]
    Busy { handler: Handler },

    /// The area of interest changed while the request was in flight; the
    /// response was discarded.
    #[error("Discarded response for a previous area of interest")]
    Stale,

    #[error("Year {year} is not part of the loaded timeline")]
    YearNotLoaded { year: i32 },

    #[error("Config error: {message}")]
    Config { message: String },
}
