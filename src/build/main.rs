//! Builds the province/district/neighborhood street hierarchy from
//! extracted boundary and street files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use osm_extract::config::Config;
use osm_extract::hierarchy::{save_hierarchy, HierarchyBuilder};
use osm_extract::loader::{load_boundaries, load_streets};
use osm_extract::logging::init_logging;
use osm_extract::output::OutputLayout;
use osm_extract::regions::BoundingBoxResolver;

#[derive(Parser, Debug)]
#[command(name = "build-hierarchy")]
#[command(about = "Group extracted streets by administrative unit")]
struct Args {
    /// Administrative boundaries file (default: <output-dir>/<country>_administrative.json)
    #[arg(long)]
    admin_file: Option<PathBuf>,

    /// Streets file (default: <output-dir>/<hierarchy.streets_source>_streets.json)
    #[arg(long)]
    streets_file: Option<PathBuf>,

    /// Output file (default: <output-dir>/<country>_hierarchy.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Process only the first N streets
    #[arg(long)]
    limit: Option<usize>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the extracted artifacts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(Level::INFO, args.log_file.as_deref())?;

    let config = Config::load(args.config.as_deref())?;
    let layout = OutputLayout::new(
        args.output_dir
            .clone()
            .unwrap_or_else(|| config.global.output_dir.clone()),
    );
    let slug = &config.global.country_slug;

    let admin_file = args
        .admin_file
        .unwrap_or_else(|| layout.administrative(slug));
    let streets_file = args
        .streets_file
        .unwrap_or_else(|| config.hierarchy.streets_file(&layout));
    let output = args.output.unwrap_or_else(|| layout.hierarchy(slug));

    info!("Street hierarchy builder");

    let boundaries = load_boundaries(&admin_file)
        .with_context(|| format!("Failed to load {}", admin_file.display()))?;
    let collection = load_streets(&streets_file)
        .with_context(|| format!("Failed to load {}", streets_file.display()))?;

    let builder = HierarchyBuilder::new(BoundingBoxResolver::default())
        .with_limit(args.limit.or(config.hierarchy.limit))
        .with_progress_interval(config.hierarchy.progress_interval);
    let (index, stats) = builder.build(&collection.streets, &boundaries);

    let document = save_hierarchy(index, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Done: {} streets in {} provinces ({} skipped)",
        document.statistics.total_streets, document.statistics.total_provinces, stats.skipped
    );
    Ok(())
}
