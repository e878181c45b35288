//! Subcommand implementations.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use sylithe_analysis_models::AreaOfInterest;
use sylithe_cli_utils::{IndicatifProgress, MultiProgress};
use sylithe_client::{AnalysisApi, ClientConfig, HttpAnalysisClient, HttpChmClient};
use sylithe_map::{LatLng, import_aoi, rectangle};
use sylithe_panels::{CHM_YEARS, DEFAULT_BASELINE_YEAR, DacbTab, baseline_panel, chm_panel, stats_panel};
use sylithe_workflow::{AnalysisConfig, ChmSession, LulcMode, Orchestrator};

use crate::render;

/// Where the area of interest comes from.
#[derive(Debug, Clone, Args)]
pub struct AoiArgs {
    /// `GeoJSON` file with the area of interest
    #[arg(long, conflicts_with = "bbox", required_unless_present = "bbox")]
    pub aoi: Option<PathBuf>,

    /// Rectangle as `west,south,east,north` in degrees
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Option<[f64; 4]>,
}

impl AoiArgs {
    /// Reads the file or builds the rectangle.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or parsed as `GeoJSON`.
    pub fn load(&self) -> Result<AreaOfInterest, Box<dyn Error>> {
        match (&self.aoi, self.bbox) {
            (Some(path), _) => Ok(import_aoi(path)?),
            (None, Some([west, south, east, north])) => Ok(rectangle(
                LatLng::new(south, west),
                LatLng::new(north, east),
            )?),
            (None, None) => Err("Provide --aoi <file> or --bbox west,south,east,north".into()),
        }
    }
}

/// Parses `west,south,east,north`.
///
/// # Errors
///
/// If there are not exactly four finite numbers or the box is inverted.
pub fn parse_bbox(value: &str) -> Result<[f64; 4], String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [west, south, east, north] = parts[..] else {
        return Err(format!("expected 4 values, got {}", parts.len()));
    };
    if west >= east || south >= north {
        return Err("expected west < east and south < north".to_string());
    }
    Ok([west, south, east, north])
}

#[derive(Debug, Subcommand)]
pub enum BaselineCommand {
    /// Create a baseline for an area of interest
    Create {
        #[command(flatten)]
        aoi: AoiArgs,
        #[arg(long, default_value_t = DEFAULT_BASELINE_YEAR)]
        year: i32,
    },
    /// Lock a baseline so it can no longer be replaced
    Lock {
        /// Baseline id
        id: String,
    },
    /// Fetch a baseline by id
    Get {
        /// Baseline id
        id: String,
    },
}

/// Shared state for a command run.
pub struct Context {
    pub client: ClientConfig,
    pub config: AnalysisConfig,
    pub multi: MultiProgress,
}

impl Context {
    fn analysis_api(&self) -> Arc<dyn AnalysisApi> {
        Arc::new(HttpAnalysisClient::from_config(&self.client))
    }

    fn orchestrator(&self, config: AnalysisConfig) -> Orchestrator {
        Orchestrator::new(self.analysis_api(), config)
    }

    fn spinner(&self, message: &str) -> Arc<dyn sylithe_workflow::ProgressCallback> {
        IndicatifProgress::spinner(&self.multi, message)
    }
}

/// Single-year land-cover classification.
///
/// # Errors
///
/// If the area cannot be loaded or the backend call fails.
pub async fn lulc(ctx: &Context, aoi: &AoiArgs, year: Option<i32>) -> Result<(), Box<dyn Error>> {
    let aoi = aoi.load()?;
    let mut config = ctx.config.clone();
    if let Some(year) = year {
        config.default_year = year;
    }

    let orchestrator = ctx
        .orchestrator(config)
        .with_progress(ctx.spinner("Classifying land cover"));
    orchestrator.polygon_drawn(aoi.clone()).await?;

    let snapshot = orchestrator.snapshot();
    render::print_panels(&[stats_panel(
        snapshot.lulc.stats.as_ref(),
        snapshot.lulc.area_km2,
        snapshot.lulc.selected_year,
    )]);
    println!("{}", render::map_summary(&aoi, &snapshot.overlays));
    Ok(())
}

/// Per-year classification over the configured range.
///
/// # Errors
///
/// If the area cannot be loaded, the backend call fails, or `year` is not
/// part of the loaded timeline.
pub async fn timeline(
    ctx: &Context,
    aoi: &AoiArgs,
    year: Option<i32>,
) -> Result<(), Box<dyn Error>> {
    let aoi = aoi.load()?;
    let orchestrator = ctx
        .orchestrator(ctx.config.clone())
        .with_progress(ctx.spinner("Loading timeline"));

    if orchestrator.toggle_timeline_mode().await? != LulcMode::Timeline {
        return Err("Failed to enter timeline mode".into());
    }
    orchestrator.polygon_drawn(aoi.clone()).await?;
    if let Some(year) = year {
        orchestrator.select_year(year)?;
    }

    let snapshot = orchestrator.snapshot();
    if let Some(timeline) = &snapshot.lulc.timeline {
        println!(
            "{}",
            render::timeline_summary(timeline, snapshot.lulc.selected_year)
        );
    }
    render::print_panels(&[stats_panel(
        snapshot.lulc.stats.as_ref(),
        snapshot.lulc.area_km2,
        snapshot.lulc.selected_year,
    )]);
    println!("{}", render::map_summary(&aoi, &snapshot.overlays));
    Ok(())
}

/// Baseline create, lock and get.
///
/// # Errors
///
/// If the area cannot be loaded or a backend call fails.
pub async fn baseline(ctx: &Context, command: &BaselineCommand) -> Result<(), Box<dyn Error>> {
    let api = ctx.analysis_api();
    let years = &ctx.config.baseline_years;

    let baseline = match command {
        BaselineCommand::Create { aoi, year } => {
            let aoi = aoi.load()?;
            let created = api.create_baseline(&aoi, *year).await?;
            log::info!("Created baseline {}", created.baseline_id);
            created
        }
        BaselineCommand::Lock { id } => {
            let receipt = api.lock_baseline(id, &ctx.config.locked_by).await?;
            if !receipt.message.is_empty() {
                log::info!("{}", receipt.message);
            }
            api.get_baseline(id).await?
        }
        BaselineCommand::Get { id } => api.get_baseline(id).await?,
    };

    render::print_panels(&[baseline_panel(Some(&baseline), years, false)]);
    Ok(())
}

/// Options for the full analysis run.
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub aoi: AoiArgs,

    /// Baseline year
    #[arg(long, default_value_t = DEFAULT_BASELINE_YEAR)]
    pub baseline_year: i32,

    /// Comparison year (defaults to the configured single year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Lock the baseline before detecting changes
    #[arg(long)]
    pub lock: bool,

    /// DACB tab to print
    #[arg(long, default_value_t = DacbTab::Baseline)]
    pub tab: DacbTab,
}

/// The full workflow: classification, baseline, optional lock, then the
/// change/risk/leakage/DACB pipeline.
///
/// A stage failure is reported but does not fail the command; the
/// results of earlier stages are still printed.
///
/// # Errors
///
/// If the area cannot be loaded, or classification, baseline creation or
/// locking fails.
pub async fn analyze(ctx: &Context, args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let aoi = args.aoi.load()?;
    let year = args.year.unwrap_or(ctx.config.default_year);

    let orchestrator = ctx.orchestrator(ctx.config.clone());

    orchestrator
        .clone()
        .with_progress(ctx.spinner("Classifying land cover"))
        .polygon_drawn(aoi.clone())
        .await?;

    let steps = orchestrator
        .clone()
        .with_progress(ctx.spinner("Creating baseline"));
    steps.create_baseline(args.baseline_year).await?;
    if args.lock {
        steps.lock_baseline().await?;
    }

    let outcome = orchestrator
        .clone()
        .with_progress(IndicatifProgress::stages_bar(&ctx.multi, "Running analysis"))
        .detect_changes(year)
        .await?;

    let snapshot = orchestrator.snapshot();
    println!("{}", render::status_line(&snapshot));
    render::print_panels(&render::analysis_panels(&snapshot, &ctx.config, args.tab));
    println!("{}", render::outcome_summary(&outcome));
    println!("{}", render::map_summary(&aoi, &snapshot.overlays));

    if let Some(error) = &snapshot.error {
        log::warn!("{error}");
    }
    Ok(())
}

/// Canopy-height prediction.
///
/// # Errors
///
/// If the area cannot be loaded, `year` is not offered, or the prediction
/// fails.
pub async fn chm(ctx: &Context, aoi: &AoiArgs, year: i32) -> Result<(), Box<dyn Error>> {
    if !CHM_YEARS.contains(&year) {
        return Err(format!(
            "CHM is available for {}-{}",
            CHM_YEARS[0],
            CHM_YEARS[CHM_YEARS.len() - 1]
        )
        .into());
    }

    let aoi = aoi.load()?;
    let session = ChmSession::new(Arc::new(HttpChmClient::from_config(&ctx.client)));
    session.polygon_complete(aoi);

    let progress = ctx.spinner(&format!("Predicting canopy height for {year}"));
    let result = session.run_analysis(year).await;
    progress.finish(if result.is_ok() {
        "CHM ready".to_string()
    } else {
        "CHM failed".to_string()
    });

    let snapshot = session.snapshot();
    render::print_panels(&[chm_panel(
        snapshot.result.as_ref(),
        snapshot.error.as_deref(),
        snapshot.polygon.is_some(),
        snapshot.analyzing,
    )]);

    result?;
    Ok(())
}
