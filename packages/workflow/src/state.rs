//! Workflow state as a single tagged union.
//!
//! Each variant carries exactly the data that exists at that stage, so the
//! downstream results can never outlive the area of interest they were
//! computed for. Transitions consume the current state and return the next
//! one; callers that must keep the old state on rejection clone first.

use sylithe_analysis_models::{
    AreaOfInterest, Baseline, ChangeResult, DacbResult, LeakageResult, RiskResult,
};
use thiserror::Error;

/// Why a transition was rejected. The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Please draw a polygon first")]
    NoAoi,

    #[error("Please create a baseline first")]
    NoBaseline,

    #[error("Baseline already locked. Cannot modify.")]
    BaselineLocked,

    /// A refreshed baseline does not belong to the current workflow.
    #[error("Baseline {actual} does not match current baseline {expected}")]
    BaselineMismatch { expected: String, actual: String },
}

/// Results of one change-detection run and the stages that depend on it.
///
/// Stages after change detection are `None` until they succeed; a failed
/// stage leaves its slot (and every later slot) empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub current_year: i32,
    pub change: ChangeResult,
    pub risk: Option<RiskResult>,
    pub leakage: Option<LeakageResult>,
    pub dacb: Option<DacbResult>,
}

impl Analysis {
    #[must_use]
    pub const fn new(current_year: i32, change: ChangeResult) -> Self {
        Self {
            current_year,
            change,
            risk: None,
            leakage: None,
            dacb: None,
        }
    }
}

/// Where the user is in the baseline → analysis flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkflowState {
    #[default]
    NoAoi,
    AoiSet {
        aoi: AreaOfInterest,
    },
    BaselineCreated {
        aoi: AreaOfInterest,
        baseline: Baseline,
    },
    BaselineLocked {
        aoi: AreaOfInterest,
        baseline: Baseline,
    },
    AnalysisComplete {
        aoi: AreaOfInterest,
        baseline: Baseline,
        analysis: Box<Analysis>,
    },
}

impl WorkflowState {
    /// Starts over with a new area of interest. Always allowed; every
    /// downstream result is dropped.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn with_aoi(self, aoi: AreaOfInterest) -> Self {
        Self::AoiSet { aoi }
    }

    /// Stores a newly created baseline, discarding any previous analysis.
    ///
    /// # Errors
    ///
    /// * [`TransitionError::NoAoi`] without an area of interest
    /// * [`TransitionError::BaselineLocked`] when the current baseline is
    ///   locked
    pub fn with_baseline(self, baseline: Baseline) -> Result<Self, TransitionError> {
        if self.is_baseline_locked() {
            return Err(TransitionError::BaselineLocked);
        }

        let aoi = self.into_aoi().ok_or(TransitionError::NoAoi)?;
        Ok(Self::settled(aoi, baseline))
    }

    /// Replaces the current baseline with a re-fetched copy of itself
    /// (after a lock), keeping any analysis.
    ///
    /// # Errors
    ///
    /// * [`TransitionError::NoBaseline`] without a baseline
    /// * [`TransitionError::BaselineMismatch`] if the ids differ
    pub fn with_refreshed_baseline(self, refreshed: Baseline) -> Result<Self, TransitionError> {
        match self {
            Self::NoAoi | Self::AoiSet { .. } => Err(TransitionError::NoBaseline),
            Self::BaselineCreated { aoi, baseline } | Self::BaselineLocked { aoi, baseline } => {
                ensure_same_baseline(&baseline, &refreshed)?;
                Ok(Self::settled(aoi, refreshed))
            }
            Self::AnalysisComplete {
                aoi,
                baseline,
                analysis,
            } => {
                ensure_same_baseline(&baseline, &refreshed)?;
                Ok(Self::AnalysisComplete {
                    aoi,
                    baseline: refreshed,
                    analysis,
                })
            }
        }
    }

    /// Stores a fresh analysis, replacing any previous one wholesale.
    ///
    /// # Errors
    ///
    /// * [`TransitionError::NoAoi`] without an area of interest
    /// * [`TransitionError::NoBaseline`] without a baseline
    pub fn with_analysis(self, analysis: Analysis) -> Result<Self, TransitionError> {
        match self {
            Self::NoAoi => Err(TransitionError::NoAoi),
            Self::AoiSet { .. } => Err(TransitionError::NoBaseline),
            Self::BaselineCreated { aoi, baseline }
            | Self::BaselineLocked { aoi, baseline }
            | Self::AnalysisComplete { aoi, baseline, .. } => Ok(Self::AnalysisComplete {
                aoi,
                baseline,
                analysis: Box::new(analysis),
            }),
        }
    }

    fn settled(aoi: AreaOfInterest, baseline: Baseline) -> Self {
        if baseline.locked {
            Self::BaselineLocked { aoi, baseline }
        } else {
            Self::BaselineCreated { aoi, baseline }
        }
    }

    fn into_aoi(self) -> Option<AreaOfInterest> {
        match self {
            Self::NoAoi => None,
            Self::AoiSet { aoi }
            | Self::BaselineCreated { aoi, .. }
            | Self::BaselineLocked { aoi, .. }
            | Self::AnalysisComplete { aoi, .. } => Some(aoi),
        }
    }

    #[must_use]
    pub const fn aoi(&self) -> Option<&AreaOfInterest> {
        match self {
            Self::NoAoi => None,
            Self::AoiSet { aoi }
            | Self::BaselineCreated { aoi, .. }
            | Self::BaselineLocked { aoi, .. }
            | Self::AnalysisComplete { aoi, .. } => Some(aoi),
        }
    }

    #[must_use]
    pub const fn baseline(&self) -> Option<&Baseline> {
        match self {
            Self::NoAoi | Self::AoiSet { .. } => None,
            Self::BaselineCreated { baseline, .. }
            | Self::BaselineLocked { baseline, .. }
            | Self::AnalysisComplete { baseline, .. } => Some(baseline),
        }
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::AnalysisComplete { analysis, .. } => Some(analysis.as_ref()),
            _ => None,
        }
    }

    pub fn analysis_mut(&mut self) -> Option<&mut Analysis> {
        match self {
            Self::AnalysisComplete { analysis, .. } => Some(analysis.as_mut()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_baseline_locked(&self) -> bool {
        self.baseline().is_some_and(|b| b.locked)
    }

    /// Short name of the current stage.
    #[must_use]
    pub const fn stage_name(&self) -> &'static str {
        match self {
            Self::NoAoi => "No area of interest",
            Self::AoiSet { .. } => "Area of interest set",
            Self::BaselineCreated { .. } => "Baseline created",
            Self::BaselineLocked { .. } => "Baseline locked",
            Self::AnalysisComplete { .. } => "Analysis complete",
        }
    }
}

fn ensure_same_baseline(current: &Baseline, refreshed: &Baseline) -> Result<(), TransitionError> {
    if current.baseline_id == refreshed.baseline_id {
        Ok(())
    } else {
        Err(TransitionError::BaselineMismatch {
            expected: current.baseline_id.clone(),
            actual: refreshed.baseline_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::fixtures;

    fn with_baseline(locked: bool) -> WorkflowState {
        let mut baseline = fixtures::baseline();
        baseline.locked = locked;
        WorkflowState::NoAoi
            .with_aoi(fixtures::aoi())
            .with_baseline(baseline)
            .unwrap()
    }

    #[test]
    fn baseline_requires_aoi() {
        assert_eq!(
            WorkflowState::NoAoi.with_baseline(fixtures::baseline()),
            Err(TransitionError::NoAoi)
        );
    }

    #[test]
    fn locked_baseline_response_lands_in_locked_state() {
        assert!(matches!(with_baseline(true), WorkflowState::BaselineLocked { .. }));
        assert!(matches!(with_baseline(false), WorkflowState::BaselineCreated { .. }));
    }

    #[test]
    fn locked_baseline_cannot_be_replaced() {
        let err = with_baseline(true).with_baseline(fixtures::baseline()).unwrap_err();
        assert_eq!(err, TransitionError::BaselineLocked);
        assert_eq!(err.to_string(), "Baseline already locked. Cannot modify.");
    }

    #[test]
    fn analysis_requires_baseline() {
        let state = WorkflowState::NoAoi.with_aoi(fixtures::aoi());
        let err = state
            .with_analysis(Analysis::new(2023, fixtures::change()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Please create a baseline first");
    }

    #[test]
    fn new_aoi_drops_everything_downstream() {
        let state = with_baseline(false)
            .with_analysis(Analysis::new(2023, fixtures::change()))
            .unwrap();
        assert!(state.analysis().is_some());

        let state = state.with_aoi(fixtures::other_aoi());
        assert!(state.baseline().is_none());
        assert!(state.analysis().is_none());
        assert_eq!(state.aoi(), Some(&fixtures::other_aoi()));
    }

    #[test]
    fn refreshing_keeps_analysis_and_updates_lock() {
        let state = with_baseline(false)
            .with_analysis(Analysis::new(2023, fixtures::change()))
            .unwrap();
        let mut locked = fixtures::baseline();
        locked.locked = true;

        let state = state.with_refreshed_baseline(locked).unwrap();
        assert!(state.is_baseline_locked());
        assert!(state.analysis().is_some());
    }

    #[test]
    fn refreshing_rejects_foreign_baseline() {
        let mut other = fixtures::baseline();
        other.baseline_id = "b2".to_string();
        assert!(matches!(
            with_baseline(false).with_refreshed_baseline(other),
            Err(TransitionError::BaselineMismatch { .. })
        ));
    }
}
