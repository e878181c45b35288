//! Menu-driven mode, used when no subcommand is given.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use sylithe_panels::{CHM_YEARS, DEFAULT_BASELINE_YEAR, DacbTab};
use strum::IntoEnumIterator as _;

use crate::commands::{self, AnalyzeArgs, AoiArgs, Context, parse_bbox};

enum Tool {
    Analyze,
    Lulc,
    Timeline,
    Chm,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Analyze,
        Self::Lulc,
        Self::Timeline,
        Self::Chm,
        Self::Server,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Analyze => "Run baseline & change analysis",
            Self::Lulc => "Classify land cover (single year)",
            Self::Timeline => "Load land-cover timeline",
            Self::Chm => "Predict canopy height",
            Self::Server => "Start marketing site",
        }
    }
}

/// Shows the tool menu and runs the chosen one.
///
/// # Errors
///
/// * If a prompt fails
/// * If the chosen tool fails
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    println!("Sylithe");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Analyze => {
            let aoi = prompt_aoi()?;
            let baseline_year = pick_year(
                "Baseline year",
                &ctx.config.baseline_years,
                DEFAULT_BASELINE_YEAR,
            )?;
            let year = pick_year(
                "Comparison year",
                &ctx.config.comparison_years,
                ctx.config.default_year,
            )?;
            let lock = Confirm::new()
                .with_prompt("Lock the baseline before comparing?")
                .default(false)
                .interact()?;
            let tabs: Vec<DacbTab> = DacbTab::iter().collect();
            let tab_labels: Vec<String> = tabs.iter().map(ToString::to_string).collect();
            let tab = Select::new()
                .with_prompt("DACB view")
                .items(&tab_labels)
                .default(0)
                .interact()?;

            commands::analyze(
                ctx,
                &AnalyzeArgs {
                    aoi,
                    baseline_year,
                    year: Some(year),
                    lock,
                    tab: tabs[tab],
                },
            )
            .await?;
        }
        Tool::Lulc => {
            let aoi = prompt_aoi()?;
            let years: Vec<i32> =
                (ctx.config.timeline_start_year..=ctx.config.timeline_end_year).collect();
            let year = pick_year("Year", &years, ctx.config.default_year)?;
            commands::lulc(ctx, &aoi, Some(year)).await?;
        }
        Tool::Timeline => {
            let aoi = prompt_aoi()?;
            commands::timeline(ctx, &aoi, None).await?;
        }
        Tool::Chm => {
            let aoi = prompt_aoi()?;
            let year = pick_year("Year", &CHM_YEARS, 2024)?;
            commands::chm(ctx, &aoi, year).await?;
        }
        Tool::Server => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(sylithe_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}

fn prompt_aoi() -> Result<AoiArgs, dialoguer::Error> {
    let from_file = Select::new()
        .with_prompt("Area of interest")
        .items(&["GeoJSON file", "Bounding box"])
        .default(0)
        .interact()?
        == 0;

    if from_file {
        let path: String = Input::new()
            .with_prompt("Path to GeoJSON")
            .interact_text()?;
        return Ok(AoiArgs {
            aoi: Some(PathBuf::from(path)),
            bbox: None,
        });
    }

    let bbox: String = Input::new()
        .with_prompt("west,south,east,north")
        .validate_with(|input: &String| parse_bbox(input).map(|_| ()))
        .interact_text()?;
    Ok(AoiArgs {
        aoi: None,
        bbox: parse_bbox(&bbox).ok(),
    })
}

fn pick_year(prompt: &str, years: &[i32], preferred: i32) -> Result<i32, dialoguer::Error> {
    if years.is_empty() {
        return Ok(preferred);
    }
    let labels: Vec<String> = years.iter().map(ToString::to_string).collect();
    let default = years.iter().position(|&y| y == preferred).unwrap_or(0);
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(years[idx])
}
