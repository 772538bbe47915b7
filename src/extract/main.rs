//! Extracts administrative boundaries, streets and POIs per region from
//! the Overpass API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use osm_extract::config::Config;
use osm_extract::extractors::{AdminExtractor, ExtractContext, ExtractionPipeline, Phase};
use osm_extract::logging::init_logging;
use osm_extract::output::OutputLayout;
use osm_extract::overpass::OverpassClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Step {
    Admin,
    Streets,
    Poi,
}

impl From<Step> for Phase {
    fn from(step: Step) -> Self {
        match step {
            Step::Admin => Phase::Administrative,
            Step::Streets => Phase::Streets,
            Step::Poi => Phase::Poi,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "extract")]
#[command(about = "Extract OSM data per region via the Overpass API")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Run only these steps (default: all, in order)
    #[arg(long, value_enum, value_delimiter = ',')]
    only: Vec<Step>,

    /// Restrict to these regions (default: configured regions)
    #[arg(long, value_delimiter = ',')]
    region: Vec<String>,

    /// Extract per-region administrative boundaries instead of running the pipeline
    #[arg(long)]
    region_admin: bool,

    /// Overpass endpoint (overrides the configuration)
    #[arg(long)]
    overpass_url: Option<String>,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(Level::INFO, args.log_file.as_deref())?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.global.output_dir = dir;
    }
    if let Some(url) = args.overpass_url {
        config.overpass.url = url;
        config.validate()?;
    }

    let regions: Vec<String> = if args.region.is_empty() {
        config.regions.clone()
    } else {
        args.region
    };
    let phases: Vec<Phase> = if args.only.is_empty() {
        Phase::all().to_vec()
    } else {
        args.only.into_iter().map(Phase::from).collect()
    };

    let layout = OutputLayout::new(config.global.output_dir.clone());
    layout.create()?;
    let client = OverpassClient::new(config.overpass.clone())
        .context("Failed to create HTTP client")?;

    info!("OSM extraction via {}", client.endpoint());
    info!("Output: {}", layout.dir().display());

    let ctx = ExtractContext {
        client: &client,
        config: &config,
        layout: &layout,
    };

    if args.region_admin {
        let saved = AdminExtractor::new(ctx).extract_regions(&regions).await;
        info!("Saved admin boundaries for {}/{} regions", saved, regions.len());
        return Ok(());
    }

    ExtractionPipeline::new(ctx).run(&phases, &regions).await?;
    Ok(())
}
