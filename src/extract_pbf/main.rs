//! Extracts streets, POIs and administrative boundaries from a local
//! OSM PBF dump.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, Level};

use osm_extract::config::Config;
use osm_extract::logging::init_logging;
use osm_extract::output::OutputLayout;
use osm_extract::pbf::PbfExtractor;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "extract-pbf")]
#[command(about = "Extract OSM data from a PBF file")]
struct Args {
    /// OSM PBF file to read
    #[arg(short, long)]
    file: PathBuf,

    /// Output directory (overrides the configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(Level::INFO, args.log_file.as_deref())?;

    let config = Config::load(args.config.as_deref())?;
    if !args.file.exists() {
        bail!("PBF file not found: {}", args.file.display());
    }

    let layout = OutputLayout::new(
        args.output_dir
            .unwrap_or_else(|| config.global.output_dir.clone()),
    );

    info!("OSM PBF extraction");
    info!("File: {}", args.file.display());

    let extractor = PbfExtractor::new(&config.pbf, &config.global.country_slug);
    let summary = extractor.run(&args.file, &layout)?;

    info!(
        "Wrote {} streets and {} POIs for {} cities",
        summary.statistics.total_streets,
        summary.statistics.total_pois,
        summary.statistics.cities_processed
    );
    Ok(())
}
