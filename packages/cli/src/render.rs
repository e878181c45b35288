//! Terminal output for workflow results.

use std::fmt::Write as _;

use sylithe_analysis_models::{AreaOfInterest, Timeline};
use sylithe_map::{
    Footprint, MapWidget, OverlayUrls, RecordingSurface, TileOverlayRenderer as _,
};
use sylithe_panels::{
    DacbTab, Panel, baseline_panel, change_panel, dacb_panel, dashboard_panel, leakage_panel,
    risk_panel, stats_panel,
};
use sylithe_workflow::{AnalysisConfig, PipelineOutcome, WorkflowSnapshot};

/// Every panel for a workflow snapshot, in sidebar order.
#[must_use]
pub fn analysis_panels(
    snapshot: &WorkflowSnapshot,
    config: &AnalysisConfig,
    tab: DacbTab,
) -> Vec<Panel> {
    let state = &snapshot.state;
    let analysis = state.analysis();
    let baseline = state.baseline();

    vec![
        stats_panel(
            snapshot.lulc.stats.as_ref(),
            snapshot.lulc.area_km2,
            snapshot.lulc.selected_year,
        ),
        baseline_panel(baseline, &config.baseline_years, snapshot.loading),
        change_panel(analysis.map(|a| &a.change)),
        risk_panel(analysis.and_then(|a| a.risk.as_ref())),
        leakage_panel(analysis.and_then(|a| a.leakage.as_ref())),
        dacb_panel(analysis.and_then(|a| a.dacb.as_ref()), tab),
        dashboard_panel(
            analysis.and_then(|a| a.dacb.as_ref()),
            analysis.map(|a| &a.change),
            analysis.and_then(|a| a.risk.as_ref()),
            baseline,
        ),
    ]
}

pub fn print_panels(panels: &[Panel]) {
    for panel in panels {
        println!("{panel}");
        println!();
    }
}

/// Current workflow stage, plus the error slot when set.
#[must_use]
pub fn status_line(snapshot: &WorkflowSnapshot) -> String {
    let mut out = format!("Stage: {}", snapshot.state.stage_name());
    if let Some(error) = &snapshot.error {
        let _ = write!(out, " (error: {error})");
    }
    out
}

/// Replays the shape and overlays onto a headless map and lists the
/// resulting view and layers.
#[must_use]
pub fn map_summary(aoi: &AreaOfInterest, overlays: &OverlayUrls) -> String {
    let mut widget = MapWidget::mount(RecordingSurface::default());
    let shape = widget.shape_created(aoi.clone());
    let footprint = Footprint::of(&shape);
    if let Some(footprint) = &footprint {
        widget.frame(footprint);
    }
    widget.render_overlays(overlays);
    let surface = widget.into_surface();

    let mut out = String::from("== Map ==\n");
    if let Some(footprint) = footprint {
        let _ = writeln!(
            out,
            "  AOI: {:.2} km², centre {:.4}, {:.4}",
            footprint.area_km2, footprint.centroid.lat, footprint.centroid.lng
        );
    }
    if let Some(view) = surface.view() {
        let _ = writeln!(out, "  Zoom: {}", view.zoom);
    }
    for (slot, layer) in surface.layers() {
        let _ = writeln!(out, "  {slot:?}: {} (opacity {})", layer.url, layer.opacity);
    }
    out
}

/// One line per loaded timeline year, marking the selected one.
#[must_use]
pub fn timeline_summary(timeline: &Timeline, selected: Option<i32>) -> String {
    let mut out = format!(
        "== Timeline ({:.2} km²) ==\n",
        timeline.aoi_area_km2
    );
    for entry in &timeline.timeline {
        let marker = if Some(entry.year) == selected { '*' } else { ' ' };
        let _ = writeln!(out, " {marker}{}  {}", entry.year, entry.tile_url);
    }
    out
}

/// Stages completed, the one that failed and the ones skipped.
#[must_use]
pub fn outcome_summary(outcome: &PipelineOutcome) -> String {
    let mut out = String::from("== Pipeline ==\n");
    for stage in &outcome.completed {
        let _ = writeln!(out, "  ok       {stage}");
    }
    if let Some(failure) = &outcome.failure {
        let _ = writeln!(out, "  failed   {}: {}", failure.stage, failure.message);
        for stage in outcome.skipped() {
            let _ = writeln!(out, "  skipped  {stage}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use sylithe_map::{LatLng, rectangle};
    use sylithe_workflow::{LulcView, Stage, StageFailure, WorkflowState};

    use super::*;

    fn aoi() -> AreaOfInterest {
        rectangle(LatLng::new(20.0, 78.0), LatLng::new(20.1, 78.1)).unwrap()
    }

    #[test]
    fn map_summary_lists_overlays() {
        let summary = map_summary(
            &aoi(),
            &OverlayUrls {
                lulc_tile_url: Some("https://tiles/lulc/{z}/{x}/{y}".to_string()),
                buffer_tile_url: Some("https://tiles/buffer/{z}/{x}/{y}".to_string()),
            },
        );
        assert!(summary.contains("Lulc: https://tiles/lulc/{z}/{x}/{y} (opacity 0.7)"));
        assert!(summary.contains("Buffer: https://tiles/buffer/{z}/{x}/{y} (opacity 1)"));
        assert!(summary.contains("centre 20.05"));
    }

    #[test]
    fn empty_session_renders_placeholders() {
        let snapshot = WorkflowSnapshot {
            state: WorkflowState::AoiSet { aoi: aoi() },
            lulc: LulcView::default(),
            overlays: OverlayUrls::default(),
            error: None,
            loading: false,
            generation: 1,
        };
        let panels = analysis_panels(&snapshot, &AnalysisConfig::default(), DacbTab::default());
        assert_eq!(panels.len(), 7);
        assert!(panels.iter().all(|p| p.is_placeholder() || p.title == "Set Baseline"));
        assert_eq!(panels[6].title, "No Analytics Data");
        assert_eq!(status_line(&snapshot), "Stage: Area of interest set");
    }

    #[test]
    fn status_line_reports_error_slot() {
        let snapshot = WorkflowSnapshot {
            state: WorkflowState::AoiSet { aoi: aoi() },
            lulc: LulcView::default(),
            overlays: OverlayUrls::default(),
            error: Some("Please create a baseline first".to_string()),
            loading: false,
            generation: 1,
        };
        assert_eq!(
            status_line(&snapshot),
            "Stage: Area of interest set (error: Please create a baseline first)"
        );
    }

    #[test]
    fn map_summary_frames_the_shape() {
        let summary = map_summary(&aoi(), &OverlayUrls::default());
        assert!(summary.contains("Zoom: 11"));
        assert!(summary.contains("AOI: 1"));
    }

    #[test]
    fn outcome_lists_skipped_stages() {
        let outcome = PipelineOutcome {
            completed: vec![Stage::ChangeDetection],
            failure: Some(StageFailure {
                stage: Stage::RiskAssessment,
                message: "API error: Internal Server Error".to_string(),
            }),
        };
        let summary = outcome_summary(&outcome);
        assert!(summary.contains("ok       Change detection"));
        assert!(summary.contains("failed   Risk assessment: API error: Internal Server Error"));
        assert!(summary.contains("skipped  Leakage analysis"));
        assert!(summary.contains("skipped  DACB analysis"));
    }
}
