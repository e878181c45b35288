//! Canopy-height workflow: one polygon, one prediction at a time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sylithe_analysis_models::{AreaOfInterest, ChmResult};
use sylithe_client::ChmApi;

use crate::WorkflowError;

#[derive(Debug, Default)]
struct ChmState {
    polygon: Option<AreaOfInterest>,
    result: Option<ChmResult>,
    error: Option<String>,
    analyzing: bool,
    generation: u64,
}

/// Copy of the CHM session for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChmSnapshot {
    pub polygon: Option<AreaOfInterest>,
    pub result: Option<ChmResult>,
    pub error: Option<String>,
    pub analyzing: bool,
}

#[derive(Clone)]
pub struct ChmSession {
    api: Arc<dyn ChmApi>,
    state: Arc<Mutex<ChmState>>,
}

impl ChmSession {
    #[must_use]
    pub fn new(api: Arc<dyn ChmApi>) -> Self {
        Self {
            api,
            state: Arc::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the finished polygon and clears the previous result.
    pub fn polygon_complete(&self, aoi: AreaOfInterest) {
        let mut state = self.lock();
        state.generation += 1;
        state.polygon = Some(aoi);
        state.result = None;
        state.error = None;
        state.analyzing = false;
    }

    /// Requests a canopy-height prediction for the stored polygon.
    ///
    /// Returns `Ok(None)` without a request when no polygon is stored. The
    /// previous result stays visible while the request runs. On failure
    /// the result is cleared and the message stored for display.
    ///
    /// # Errors
    ///
    /// * [`WorkflowError::Client`] if the prediction fails
    /// * [`WorkflowError::Stale`] if the polygon changed meanwhile
    pub async fn run_analysis(&self, year: i32) -> Result<Option<ChmResult>, WorkflowError> {
        let (aoi, generation) = {
            let mut state = self.lock();
            let Some(aoi) = state.polygon.clone() else {
                log::debug!("No polygon drawn, skipping CHM analysis");
                return Ok(None);
            };
            state.analyzing = true;
            state.error = None;
            (aoi, state.generation)
        };

        log::info!("Running CHM prediction for {year}");
        let response = self.api.predict(&aoi, year).await;

        let mut state = self.lock();
        if state.generation != generation {
            log::warn!("Discarding CHM response for a previous polygon");
            return Err(WorkflowError::Stale);
        }
        state.analyzing = false;

        match response {
            Ok(result) => {
                state.result = Some(result.clone());
                drop(state);
                Ok(Some(result))
            }
            Err(e) => {
                log::error!("CHM prediction failed: {e}");
                state.result = None;
                state.error = Some(e.to_string());
                drop(state);
                Err(e.into())
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ChmSnapshot {
        let state = self.lock();
        ChmSnapshot {
            polygon: state.polygon.clone(),
            result: state.result.clone(),
            error: state.error.clone(),
            analyzing: state.analyzing,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sylithe_client::ClientError;

    use super::*;
    use crate::mock::{Gate, MockChmApi, fixtures};

    #[tokio::test]
    async fn without_polygon_nothing_is_requested() {
        let api = Arc::new(MockChmApi::default());
        let session = ChmSession::new(api.clone());

        assert!(session.run_analysis(2023).await.unwrap().is_none());
        assert_eq!(api.requests(), 0);
    }

    #[tokio::test]
    async fn result_is_stored() {
        let api = Arc::new(MockChmApi::default());
        let session = ChmSession::new(api.clone());
        session.polygon_complete(fixtures::aoi());

        let result = session.run_analysis(2022).await.unwrap().unwrap();
        assert_eq!(result.year, 2022);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.result, Some(result));
        assert!(!snapshot.analyzing);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn backend_message_is_surfaced_and_result_cleared() {
        let api = Arc::new(MockChmApi::default());
        let session = ChmSession::new(api.clone());
        session.polygon_complete(fixtures::aoi());
        session.run_analysis(2023).await.unwrap();

        api.fail_with("Polygon too large");
        let err = session.run_analysis(2023).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Client(ClientError::Chm { .. })
        ));

        let snapshot = session.snapshot();
        assert!(snapshot.result.is_none());
        assert_eq!(snapshot.error.as_deref(), Some("Polygon too large"));
    }

    #[tokio::test]
    async fn new_polygon_clears_previous_result() {
        let api = Arc::new(MockChmApi::default());
        let session = ChmSession::new(api);
        session.polygon_complete(fixtures::aoi());
        session.run_analysis(2023).await.unwrap();

        session.polygon_complete(fixtures::other_aoi());
        let snapshot = session.snapshot();
        assert!(snapshot.result.is_none());
        assert_eq!(snapshot.polygon, Some(fixtures::other_aoi()));
    }

    #[tokio::test]
    async fn old_result_stays_visible_while_loading() {
        let gate = Gate::new();
        let api = Arc::new(MockChmApi::default());
        let session = ChmSession::new(api.clone());
        session.polygon_complete(fixtures::aoi());
        session.run_analysis(2021).await.unwrap();
        api.gate(gate.clone());

        let running = tokio::spawn({
            let session = session.clone();
            async move { session.run_analysis(2023).await }
        });
        gate.entered().await;

        let snapshot = session.snapshot();
        assert!(snapshot.analyzing);
        assert_eq!(snapshot.result.map(|r| r.year), Some(2021));

        gate.release();
        let result = running.await.unwrap().unwrap().unwrap();
        assert_eq!(result.year, 2023);
    }

    #[tokio::test]
    async fn response_for_replaced_polygon_is_discarded() {
        let gate = Gate::new();
        let api = Arc::new(MockChmApi::default());
        let session = ChmSession::new(api.clone());
        session.polygon_complete(fixtures::aoi());
        api.gate(gate.clone());

        let running = tokio::spawn({
            let session = session.clone();
            async move { session.run_analysis(2023).await }
        });
        gate.entered().await;
        session.polygon_complete(fixtures::other_aoi());
        gate.release();

        assert!(matches!(running.await.unwrap(), Err(WorkflowError::Stale)));
        assert!(session.snapshot().result.is_none());
    }
}
