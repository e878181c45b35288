//! Sequences dependent backend calls and owns the workflow session.
//!
//! Every handler is its own error boundary: it clears the shared error slot
//! when it starts and fills it when it fails. Precondition failures are
//! reported before any request is made.
//!
//! Handlers may run concurrently. Re-triggering a handler that is already
//! running for the same area of interest returns [`WorkflowError::Busy`],
//! as does touching the baseline while another baseline handler or the
//! pipeline runs.
//! Drawing a new shape is always allowed; responses that arrive for an
//! older shape are discarded instead of overwriting newer state.

use std::future::Future;
use std::sync::Arc;

use sylithe_analysis_models::{AreaOfInterest, Baseline};
use sylithe_client::{AnalysisApi, ClientError};
use sylithe_map::OverlayUrls;

use crate::config::AnalysisConfig;
use crate::pipeline::{PipelineOutcome, Stage, StageFailure};
use crate::progress::{ProgressCallback, null_progress};
use crate::session::{
    Handler, InFlight, LulcMode, Session, SharedSession, WorkflowSnapshot, lock,
};
use crate::state::{Analysis, TransitionError};
use crate::WorkflowError;

/// Drives the analysis workflow against an [`AnalysisApi`].
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct Orchestrator {
    api: Arc<dyn AnalysisApi>,
    config: AnalysisConfig,
    progress: Arc<dyn ProgressCallback>,
    session: SharedSession,
}

impl Orchestrator {
    #[must_use]
    pub fn new(api: Arc<dyn AnalysisApi>, config: AnalysisConfig) -> Self {
        Self {
            api,
            config,
            progress: null_progress(),
            session: SharedSession::default(),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Copy of the current session for rendering.
    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        lock(&self.session).snapshot()
    }

    /// Stores a newly drawn or imported shape, resets every downstream
    /// result and overlay, then runs the default LULC analysis for the
    /// current mode.
    ///
    /// # Errors
    ///
    /// Propagates the error of the follow-up LULC analysis.
    pub async fn polygon_drawn(&self, aoi: AreaOfInterest) -> Result<(), WorkflowError> {
        let mode = {
            let mut session = lock(&self.session);
            session.generation += 1;
            session.state = std::mem::take(&mut session.state).with_aoi(aoi);
            session.lulc.clear();
            session.overlays = OverlayUrls::default();
            session.error = None;
            log::info!(
                "New area of interest (generation {}), downstream results cleared",
                session.generation
            );
            session.lulc.mode
        };

        match mode {
            LulcMode::SingleYear => self.analyze_single_year(self.config.default_year).await,
            LulcMode::Timeline => self.load_timeline().await,
        }
    }

    /// Classifies the current shape for one calendar year.
    ///
    /// # Errors
    ///
    /// * [`WorkflowError::Busy`] if already running
    /// * [`WorkflowError::Transition`] without a shape
    /// * [`WorkflowError::Client`] if the request fails
    /// * [`WorkflowError::Stale`] if the shape changed meanwhile
    pub async fn analyze_single_year(&self, year: i32) -> Result<(), WorkflowError> {
        let (_guard, generation) = self.begin(Handler::Lulc)?;
        let aoi = self.require_aoi(generation)?;

        self.progress.set_message(format!("Analyzing LULC for {year}"));
        let start = format!("{year}-01-01");
        let end = format!("{year}-12-31");
        let result = self
            .api
            .analyze_lulc(&aoi, &start, &end)
            .await
            .map_err(|e| self.fail(generation, e.into()))?;

        self.commit(generation, |session| {
            session.lulc.selected_year = Some(year);
            session.lulc.stats = result.stats;
            session.lulc.area_km2 = Some(result.aoi_area_km2);
            session.lulc.timeline = None;
            session.overlays.lulc_tile_url = Some(result.tile_url);
        })?;

        self.progress.finish(format!("LULC {year} ready"));
        Ok(())
    }

    /// Loads the configured multi-year timeline and shows its latest year.
    ///
    /// # Errors
    ///
    /// Same as [`Self::analyze_single_year`].
    pub async fn load_timeline(&self) -> Result<(), WorkflowError> {
        let (_guard, generation) = self.begin(Handler::Timeline)?;
        let aoi = self.require_aoi(generation)?;
        let (start, end) = (self.config.timeline_start_year, self.config.timeline_end_year);

        self.progress
            .set_message(format!("Loading timeline {start}-{end}"));
        let timeline = self
            .api
            .analyze_timeline(&aoi, start, end)
            .await
            .map_err(|e| self.fail(generation, e.into()))?;

        self.commit(generation, |session| {
            session.lulc.area_km2 = Some(timeline.aoi_area_km2);
            if let Some(latest) = timeline.latest() {
                session.lulc.selected_year = Some(latest.year);
                session.lulc.stats = Some(latest.stats.clone());
                session.overlays.lulc_tile_url = Some(latest.tile_url.clone());
            }
            session.lulc.timeline = Some(timeline);
        })?;

        self.progress.finish("Timeline ready".to_string());
        Ok(())
    }

    /// Shows a year from the loaded timeline. No request is made.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::YearNotLoaded`] if the year is not in the
    /// loaded timeline.
    pub fn select_year(&self, year: i32) -> Result<(), WorkflowError> {
        let mut session = lock(&self.session);
        let entry = session
            .lulc
            .timeline
            .as_ref()
            .and_then(|t| t.year(year))
            .cloned()
            .ok_or(WorkflowError::YearNotLoaded { year })?;

        session.lulc.selected_year = Some(year);
        session.lulc.stats = Some(entry.stats);
        session.overlays.lulc_tile_url = Some(entry.tile_url);
        Ok(())
    }

    /// Switches between single-year and timeline mode. Switching to
    /// timeline mode with a shape present loads the timeline.
    ///
    /// # Errors
    ///
    /// Propagates the error of the timeline load.
    pub async fn toggle_timeline_mode(&self) -> Result<LulcMode, WorkflowError> {
        let (mode, has_aoi) = {
            let mut session = lock(&self.session);
            session.lulc.mode = session.lulc.mode.toggled();
            (session.lulc.mode, session.state.aoi().is_some())
        };
        log::info!("LULC mode: {mode}");

        if mode == LulcMode::Timeline && has_aoi {
            self.load_timeline().await?;
        }
        Ok(mode)
    }

    /// Creates a baseline for the current shape.
    ///
    /// # Errors
    ///
    /// * [`WorkflowError::Transition`] without a shape ("Please draw a
    ///   polygon first") or when the current baseline is locked
    /// * [`WorkflowError::Busy`], [`WorkflowError::Client`],
    ///   [`WorkflowError::Stale`] as for every handler
    pub async fn create_baseline(&self, year: i32) -> Result<Baseline, WorkflowError> {
        let (_guard, generation) = self.begin(Handler::CreateBaseline)?;
        let aoi = self.require_aoi(generation)?;
        if lock(&self.session).state.is_baseline_locked() {
            return Err(self.fail(generation, TransitionError::BaselineLocked.into()));
        }

        self.progress
            .set_message(format!("Creating {year} baseline"));
        let baseline = self
            .api
            .create_baseline(&aoi, year)
            .await
            .map_err(|e| self.fail(generation, e.into()))?;

        self.try_commit(generation, |session| {
            session.state = session.state.clone().with_baseline(baseline.clone())?;
            session.lulc.stats = Some(baseline.stats.clone());
            session.lulc.area_km2 = Some(baseline.area_km2);
            session.overlays.lulc_tile_url = Some(baseline.tile_url.clone());
            session.overlays.buffer_tile_url = None;
            Ok(())
        })?;

        log::info!(
            "Baseline {} created for {}",
            baseline.baseline_id,
            baseline.baseline_year
        );
        self.progress.finish("Baseline created".to_string());
        Ok(baseline)
    }

    /// Locks the current baseline, then re-fetches it so the displayed lock
    /// state is whatever the backend now reports.
    ///
    /// # Errors
    ///
    /// * [`WorkflowError::Transition`] without a baseline or when it is
    ///   already locked
    /// * [`WorkflowError::Busy`], [`WorkflowError::Client`],
    ///   [`WorkflowError::Stale`] as for every handler
    pub async fn lock_baseline(&self) -> Result<Baseline, WorkflowError> {
        let (_guard, generation) = self.begin(Handler::LockBaseline)?;
        let current = lock(&self.session).state.baseline().cloned();
        let Some(current) = current else {
            return Err(self.fail(generation, TransitionError::NoBaseline.into()));
        };
        if current.locked {
            return Err(self.fail(generation, TransitionError::BaselineLocked.into()));
        }

        self.progress
            .set_message(format!("Locking baseline {}", current.baseline_id));
        self.api
            .lock_baseline(&current.baseline_id, &self.config.locked_by)
            .await
            .map_err(|e| self.fail(generation, e.into()))?;
        self.commit(generation, |_| ())?;

        let refreshed = self
            .api
            .get_baseline(&current.baseline_id)
            .await
            .map_err(|e| self.fail(generation, e.into()))?;

        self.try_commit(generation, |session| {
            session.state = session.state.clone().with_refreshed_baseline(refreshed.clone())?;
            Ok(())
        })?;

        log::info!(
            "Baseline {} locked at {}",
            refreshed.baseline_id,
            refreshed.locked_at.as_deref().unwrap_or("unknown time")
        );
        self.progress.finish("Baseline locked".to_string());
        Ok(refreshed)
    }

    /// Runs change detection, then risk, leakage and DACB in order, each
    /// only after the previous one succeeded.
    ///
    /// A stage failure is not an `Err`: earlier results stay in the state,
    /// the error slot is set and the returned [`PipelineOutcome`] names the
    /// failed stage. A successful change detection replaces any previous
    /// analysis wholesale.
    ///
    /// # Errors
    ///
    /// * [`WorkflowError::Transition`] without a baseline ("Please create a
    ///   baseline first")
    /// * [`WorkflowError::InvalidYear`] unless `year` is after the baseline
    ///   year
    /// * [`WorkflowError::Busy`] or [`WorkflowError::Stale`]
    pub async fn detect_changes(&self, year: i32) -> Result<PipelineOutcome, WorkflowError> {
        let (_guard, generation) = self.begin(Handler::DetectChanges)?;
        let (aoi, baseline) = {
            let session = lock(&self.session);
            (
                session.state.aoi().cloned(),
                session.state.baseline().cloned(),
            )
        };
        let (Some(aoi), Some(baseline)) = (aoi, baseline) else {
            return Err(self.fail(generation, TransitionError::NoBaseline.into()));
        };
        if year <= baseline.baseline_year {
            return Err(self.fail(
                generation,
                WorkflowError::InvalidYear {
                    year,
                    baseline_year: baseline.baseline_year,
                },
            ));
        }

        let id = baseline.baseline_id.as_str();
        let mut outcome = PipelineOutcome::default();
        self.progress.set_total(Stage::ALL.len() as u64);
        log::info!(
            "Running analysis pipeline {} -> {year} for baseline {id}",
            baseline.baseline_year
        );

        let Some(change) = self
            .run_stage(generation, Stage::ChangeDetection, &mut outcome, async {
                self.api.detect_changes(id, year, &aoi).await
            })
            .await?
        else {
            return Ok(outcome);
        };
        let change_tile = change.current_tile_url.clone();
        self.try_commit(generation, |session| {
            if !same_baseline(session, &baseline) {
                return Ok(false);
            }
            session.state = session
                .state
                .clone()
                .with_analysis(Analysis::new(year, change))?;
            if let Some(url) = change_tile {
                session.overlays.lulc_tile_url = Some(url);
            }
            session.overlays.buffer_tile_url = None;
            Ok(true)
        })
        .and_then(|applied| self.applied(applied, &baseline))?;

        let Some(risk) = self
            .run_stage(generation, Stage::RiskAssessment, &mut outcome, async {
                self.api.assess_risk(id, year, &aoi).await
            })
            .await?
        else {
            return Ok(outcome);
        };
        self.commit_analysis(generation, &baseline, |analysis, _| {
            analysis.risk = Some(risk);
        })?;

        let Some(leakage) = self
            .run_stage(generation, Stage::LeakageAnalysis, &mut outcome, async {
                self.api.analyze_leakage(id, year, &aoi).await
            })
            .await?
        else {
            return Ok(outcome);
        };
        self.commit_analysis(generation, &baseline, |analysis, overlays| {
            overlays.buffer_tile_url = leakage.buffer_tile().map(str::to_string);
            analysis.leakage = Some(leakage);
        })?;

        let Some(dacb) = self
            .run_stage(generation, Stage::Dacb, &mut outcome, async {
                self.api
                    .analyze_dacb(
                        &aoi,
                        baseline.baseline_year,
                        year,
                        self.config.buffer_km,
                        self.config.use_knn,
                    )
                    .await
            })
            .await?
        else {
            return Ok(outcome);
        };
        self.commit_analysis(generation, &baseline, |analysis, _| {
            analysis.dacb = Some(dacb);
        })?;

        self.progress.finish("Analysis complete".to_string());
        Ok(outcome)
    }

    /// Awaits one pipeline stage. `Ok(None)` means the stage failed and was
    /// recorded in `outcome`.
    async fn run_stage<T>(
        &self,
        generation: u64,
        stage: Stage,
        outcome: &mut PipelineOutcome,
        call: impl Future<Output = Result<T, ClientError>> + Send,
    ) -> Result<Option<T>, WorkflowError> {
        self.progress.set_message(format!("{stage}..."));

        match call.await {
            Ok(value) => {
                self.commit(generation, |_| ())?;
                outcome.completed.push(stage);
                self.progress.inc(1);
                Ok(Some(value))
            }
            Err(e) => {
                let err = self.fail(generation, e.into());
                if matches!(err, WorkflowError::Stale) {
                    return Err(err);
                }
                log::error!("{stage} failed, skipping remaining stages");
                outcome.failure = Some(StageFailure {
                    stage,
                    message: err.to_string(),
                });
                self.progress.finish(format!("{stage} failed"));
                Ok(None)
            }
        }
    }

    fn begin(&self, handler: Handler) -> Result<(InFlight, u64), WorkflowError> {
        InFlight::begin(&self.session, handler).map_err(|running| {
            log::debug!("{handler} refused, {running} already running");
            WorkflowError::Busy { handler: running }
        })
    }

    fn require_aoi(&self, generation: u64) -> Result<AreaOfInterest, WorkflowError> {
        let aoi = lock(&self.session).state.aoi().cloned();
        aoi.ok_or_else(|| self.fail(generation, TransitionError::NoAoi.into()))
    }

    /// Applies `update` if the area of interest has not changed since
    /// `generation`.
    fn commit<T>(
        &self,
        generation: u64,
        update: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, WorkflowError> {
        let mut session = lock(&self.session);
        if session.generation != generation {
            log::warn!(
                "Discarding response for generation {generation}, current is {}",
                session.generation
            );
            return Err(WorkflowError::Stale);
        }
        Ok(update(&mut session))
    }

    /// Attaches a later pipeline result to the analysis of `baseline`.
    /// Discarded as stale if the baseline or its analysis is gone.
    fn commit_analysis(
        &self,
        generation: u64,
        baseline: &Baseline,
        update: impl FnOnce(&mut Analysis, &mut OverlayUrls),
    ) -> Result<(), WorkflowError> {
        let applied = self.commit(generation, |session| {
            if !same_baseline(session, baseline) {
                return false;
            }
            let Session {
                state, overlays, ..
            } = session;
            state.analysis_mut().is_some_and(|analysis| {
                update(analysis, overlays);
                true
            })
        })?;
        self.applied(applied, baseline)
    }

    fn applied(&self, applied: bool, baseline: &Baseline) -> Result<(), WorkflowError> {
        if applied {
            return Ok(());
        }
        log::warn!(
            "Discarding pipeline result for baseline {} ({}), it was replaced",
            baseline.baseline_id,
            baseline.baseline_year
        );
        self.progress.finish("Analysis discarded".to_string());
        Err(WorkflowError::Stale)
    }

    /// Like [`Self::commit`] for updates that apply a state transition. A
    /// refused transition is recorded in the error slot.
    fn try_commit<T>(
        &self,
        generation: u64,
        update: impl FnOnce(&mut Session) -> Result<T, TransitionError>,
    ) -> Result<T, WorkflowError> {
        self.commit(generation, update)?
            .map_err(|e| self.fail(generation, e.into()))
    }

    /// Records `err` in the error slot unless the response is stale, in
    /// which case [`WorkflowError::Stale`] is returned instead.
    fn fail(&self, generation: u64, err: WorkflowError) -> WorkflowError {
        let mut session = lock(&self.session);
        if session.generation != generation {
            log::warn!("Discarding failure for generation {generation}: {err}");
            return WorkflowError::Stale;
        }
        log::error!("{err}");
        session.error = Some(err.to_string());
        err
    }
}

/// Whether the session still holds the baseline a pipeline started from.
fn same_baseline(session: &Session, baseline: &Baseline) -> bool {
    session.state.baseline().is_some_and(|current| {
        current.baseline_id == baseline.baseline_id
            && current.baseline_year == baseline.baseline_year
    })
}
