//! The dependent-stage pipeline run after a comparison year is chosen.
//!
//! Stages run strictly in order, each only after the previous one
//! succeeded. A failure stops the pipeline: results of earlier stages stay
//! in the workflow state, the failed stage and everything after it stay
//! empty.

use strum_macros::{AsRefStr, Display, EnumIter};

/// One backend call in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumIter)]
pub enum Stage {
    #[strum(to_string = "Change detection")]
    ChangeDetection,
    #[strum(to_string = "Risk assessment")]
    RiskAssessment,
    #[strum(to_string = "Leakage analysis")]
    LeakageAnalysis,
    #[strum(to_string = "DACB analysis")]
    Dacb,
}

impl Stage {
    /// Every stage in execution order.
    pub const ALL: [Self; 4] = [
        Self::ChangeDetection,
        Self::RiskAssessment,
        Self::LeakageAnalysis,
        Self::Dacb,
    ];
}

/// The stage that stopped the pipeline and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

/// What a pipeline run achieved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Stages that succeeded, in order.
    pub completed: Vec<Stage>,
    pub failure: Option<StageFailure>,
}

impl PipelineOutcome {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Stages that never ran because an earlier one failed.
    #[must_use]
    pub fn skipped(&self) -> Vec<Stage> {
        let Some(failure) = &self.failure else {
            return Vec::new();
        };
        Stage::ALL
            .into_iter()
            .filter(|stage| *stage > failure.stage)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn stages_run_in_declared_order() {
        assert_eq!(Stage::iter().collect::<Vec<_>>(), Stage::ALL.to_vec());
        assert_eq!(Stage::Dacb.to_string(), "DACB analysis");
    }

    #[test]
    fn skipped_stages_follow_failure() {
        let outcome = PipelineOutcome {
            completed: vec![Stage::ChangeDetection, Stage::RiskAssessment],
            failure: Some(StageFailure {
                stage: Stage::LeakageAnalysis,
                message: "API error: Internal Server Error".to_string(),
            }),
        };
        assert!(!outcome.is_complete());
        assert_eq!(outcome.skipped(), vec![Stage::Dacb]);
        assert!(PipelineOutcome::default().skipped().is_empty());
    }
}
