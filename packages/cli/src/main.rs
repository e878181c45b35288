#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for Sylithe forest-carbon analysis.
//!
//! Each subcommand drives one workflow against the analysis backend and
//! prints the resulting panels. Run without a subcommand for an
//! interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`sylithe_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod commands;
mod interactive;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sylithe_client::ClientConfig;
use sylithe_workflow::AnalysisConfig;

use commands::{AnalyzeArgs, AoiArgs, BaselineCommand, Context};

#[derive(Parser)]
#[command(name = "sylithe", about = "Forest-carbon baselines, change detection and CHM")]
struct Cli {
    /// Analysis API base URL (overrides `SYLITHE_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// CHM API base URL (overrides `SYLITHE_CHM_API_URL`)
    #[arg(long, global = true)]
    chm_url: Option<String>,

    /// TOML file with analysis settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify land cover for a single year
    Lulc {
        #[command(flatten)]
        aoi: AoiArgs,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Classify every year in the configured range
    Timeline {
        #[command(flatten)]
        aoi: AoiArgs,
        /// Year to select after loading
        #[arg(long)]
        year: Option<i32>,
    },
    /// Create, lock or fetch a baseline
    Baseline {
        #[command(subcommand)]
        command: BaselineCommand,
    },
    /// Run the full baseline and change-detection workflow
    Analyze(AnalyzeArgs),
    /// Predict canopy height
    Chm {
        #[command(flatten)]
        aoi: AoiArgs,
        #[arg(long, default_value_t = 2024)]
        year: i32,
    },
    /// Start the marketing site
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = sylithe_cli_utils::init_logger();
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    let client = ClientConfig::from_env().with_overrides(args.api_url, args.chm_url);
    log::debug!("API {} / CHM {}", client.api_url, client.chm_api_url);

    let ctx = Context {
        client,
        config,
        multi,
    };

    match args.command {
        None => interactive::run(&ctx).await?,
        Some(Commands::Lulc { aoi, year }) => commands::lulc(&ctx, &aoi, year).await?,
        Some(Commands::Timeline { aoi, year }) => commands::timeline(&ctx, &aoi, year).await?,
        Some(Commands::Baseline { command }) => commands::baseline(&ctx, &command).await?,
        Some(Commands::Analyze(analyze)) => commands::analyze(&ctx, &analyze).await?,
        Some(Commands::Chm { aoi, year }) => commands::chm(&ctx, &aoi, year).await?,
        Some(Commands::Serve) => serve().await?,
    }

    Ok(())
}

/// The server uses actix-web's runtime, so it runs in a blocking task to
/// avoid nesting tokio runtimes.
async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(|| {
        actix_web::rt::System::new().block_on(sylithe_server::run_server())
    })
    .await??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use sylithe_panels::DacbTab;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_parses_with_defaults() {
        let cli = Cli::parse_from([
            "sylithe",
            "analyze",
            "--bbox",
            "-60.1,-3.2,-60.0,-3.1",
            "--tab",
            "credits",
        ]);
        let Some(Commands::Analyze(args)) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.aoi.bbox, Some([-60.1, -3.2, -60.0, -3.1]));
        assert_eq!(args.baseline_year, 2019);
        assert_eq!(args.year, None);
        assert!(!args.lock);
        assert_eq!(args.tab, DacbTab::Credits);
    }

    #[test]
    fn aoi_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["sylithe", "lulc"]).is_err());
        assert!(
            Cli::try_parse_from([
                "sylithe",
                "lulc",
                "--aoi",
                "aoi.geojson",
                "--bbox",
                "0,0,1,1",
            ])
            .is_err()
        );
    }

    #[test]
    fn global_overrides_follow_the_subcommand() {
        let cli = Cli::parse_from([
            "sylithe",
            "baseline",
            "get",
            "b-1",
            "--api-url",
            "http://localhost:8000",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000"));
        assert!(matches!(
            cli.command,
            Some(Commands::Baseline {
                command: BaselineCommand::Get { ref id }
            }) if id == "b-1"
        ));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        assert!(Cli::parse_from(["sylithe"]).command.is_none());
    }
}
