//! Shared mutable session behind the orchestrator.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strum_macros::{AsRefStr, Display};
use sylithe_analysis_models::{LulcStats, Timeline};
use sylithe_map::OverlayUrls;

use crate::state::WorkflowState;

/// Whether a drawn shape is analysed for one year or as a timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum LulcMode {
    #[default]
    #[strum(to_string = "Single Year")]
    SingleYear,
    #[strum(to_string = "Timeline Mode")]
    Timeline,
}

impl LulcMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::SingleYear => Self::Timeline,
            Self::Timeline => Self::SingleYear,
        }
    }
}

/// The land-cover view shown alongside the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LulcView {
    pub mode: LulcMode,
    pub selected_year: Option<i32>,
    pub stats: Option<LulcStats>,
    pub area_km2: Option<f64>,
    pub timeline: Option<Timeline>,
}

impl LulcView {
    /// Drops results, keeping the mode.
    pub fn clear(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }

    /// Year to show in the stats title (timeline mode only).
    #[must_use]
    pub fn title_year(&self) -> Option<i32> {
        match self.mode {
            LulcMode::Timeline => self.selected_year,
            LulcMode::SingleYear => None,
        }
    }
}

/// User-triggerable handlers. At most one of each runs per area of
/// interest, and the baseline handlers exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
pub enum Handler {
    #[strum(to_string = "LULC analysis")]
    Lulc,
    #[strum(to_string = "Timeline analysis")]
    Timeline,
    #[strum(to_string = "Baseline creation")]
    CreateBaseline,
    #[strum(to_string = "Baseline lock")]
    LockBaseline,
    #[strum(to_string = "Change detection")]
    DetectChanges,
}

impl Handler {
    /// Handlers that read or replace the baseline. Only one of them may
    /// run at a time, so a pipeline always finishes against the baseline
    /// it started with.
    #[must_use]
    pub const fn touches_baseline(self) -> bool {
        matches!(
            self,
            Self::CreateBaseline | Self::LockBaseline | Self::DetectChanges
        )
    }

    #[must_use]
    pub const fn excludes(self, other: Self) -> bool {
        self as u8 == other as u8 || (self.touches_baseline() && other.touches_baseline())
    }
}

#[derive(Debug, Default)]
pub(crate) struct Session {
    pub state: WorkflowState,
    pub lulc: LulcView,
    pub overlays: OverlayUrls,
    pub error: Option<String>,
    /// Bumped every time a new area of interest is drawn.
    pub generation: u64,
    pub in_flight: BTreeSet<(Handler, u64)>,
}

/// Immutable copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub lulc: LulcView,
    pub overlays: OverlayUrls,
    /// The single shared error slot.
    pub error: Option<String>,
    /// A handler is in flight for the current area of interest.
    pub loading: bool,
    pub generation: u64,
}

impl Session {
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            state: self.state.clone(),
            lulc: self.lulc.clone(),
            overlays: self.overlays.clone(),
            error: self.error.clone(),
            loading: self
                .in_flight
                .iter()
                .any(|(_, generation)| *generation == self.generation),
            generation: self.generation,
        }
    }
}

pub(crate) type SharedSession = Arc<Mutex<Session>>;

pub(crate) fn lock(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a handler as running until dropped.
pub(crate) struct InFlight {
    session: SharedSession,
    key: (Handler, u64),
}

impl InFlight {
    /// Registers `handler` for the current generation.
    ///
    /// Fails with the running handler when one that excludes `handler` is
    /// already in flight for this generation. Clears the error slot on
    /// success.
    pub fn begin(session: &SharedSession, handler: Handler) -> Result<(Self, u64), Handler> {
        let mut guard = lock(session);
        let generation = guard.generation;
        if let Some((running, _)) = guard
            .in_flight
            .iter()
            .find(|(running, g)| *g == generation && running.excludes(handler))
        {
            return Err(*running);
        }
        let key = (handler, generation);
        guard.in_flight.insert(key);
        guard.error = None;
        drop(guard);

        Ok((
            Self {
                session: Arc::clone(session),
                key,
            },
            generation,
        ))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock(&self.session).in_flight.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_handler_cannot_start_twice_for_one_generation() {
        let session = SharedSession::default();
        let (first, generation) = InFlight::begin(&session, Handler::Lulc).unwrap();
        assert_eq!(generation, 0);
        assert_eq!(
            InFlight::begin(&session, Handler::Lulc).err(),
            Some(Handler::Lulc)
        );
        assert!(InFlight::begin(&session, Handler::Timeline).is_ok());

        drop(first);
        assert!(InFlight::begin(&session, Handler::Lulc).is_ok());
    }

    #[test]
    fn baseline_handlers_exclude_each_other() {
        let session = SharedSession::default();
        let pipeline = InFlight::begin(&session, Handler::DetectChanges).unwrap();

        assert_eq!(
            InFlight::begin(&session, Handler::CreateBaseline).err(),
            Some(Handler::DetectChanges)
        );
        assert_eq!(
            InFlight::begin(&session, Handler::LockBaseline).err(),
            Some(Handler::DetectChanges)
        );
        assert!(InFlight::begin(&session, Handler::Lulc).is_ok());

        drop(pipeline);
        let _create = InFlight::begin(&session, Handler::CreateBaseline).unwrap();
        assert_eq!(
            InFlight::begin(&session, Handler::DetectChanges).err(),
            Some(Handler::CreateBaseline)
        );
    }

    #[test]
    fn new_generation_is_not_blocked_by_stale_handler() {
        let session = SharedSession::default();
        let _old = InFlight::begin(&session, Handler::Lulc).unwrap();
        lock(&session).generation += 1;

        assert!(InFlight::begin(&session, Handler::Lulc).is_ok());
    }

    #[test]
    fn loading_tracks_current_generation_only() {
        let session = SharedSession::default();
        let guard = InFlight::begin(&session, Handler::CreateBaseline).unwrap();
        assert!(lock(&session).snapshot().loading);

        lock(&session).generation += 1;
        assert!(!lock(&session).snapshot().loading);
        drop(guard);
    }

    #[test]
    fn clearing_view_keeps_mode() {
        let mut view = LulcView {
            mode: LulcMode::Timeline,
            selected_year: Some(2020),
            ..LulcView::default()
        };
        view.clear();
        assert_eq!(view.mode, LulcMode::Timeline);
        assert!(view.selected_year.is_none());
    }
}
