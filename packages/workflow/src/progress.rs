//! Progress reporting for workflow handlers.
//!
//! The orchestrator reports what it is waiting on through
//! [`ProgressCallback`]; rendering (progress bars, log lines, nothing) is
//! chosen by the caller.

use std::sync::Arc;

/// Receives progress updates. Must be `Send + Sync` so one instance can be
/// shared by concurrently running handlers.
pub trait ProgressCallback: Send + Sync {
    /// Number of steps the current operation will take.
    fn set_total(&self, total: u64);

    /// Advance by `delta` steps.
    fn inc(&self, delta: u64);

    /// What is currently running.
    fn set_message(&self, msg: String);

    /// Mark the operation complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
