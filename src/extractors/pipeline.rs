//! Full Overpass run: administrative boundaries, then streets, then POIs.

use chrono::{DateTime, Local, TimeDelta};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::poi::total_pois;
use super::streets::total_streets;
use super::{
    pause, AdminExtractor, ExtractContext, PoiExtractor, PoiRegionSummary, StreetExtractor,
    StreetRegionSummary,
};
use crate::error::Result;
use crate::output::{save_json, timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Administrative,
    Streets,
    Poi,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[Phase::Administrative, Phase::Streets, Phase::Poi]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub start_time: String,
    pub project: String,
    pub regions_processed: Vec<String>,
    pub administrative_units: usize,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub streets_summary: IndexMap<String, StreetRegionSummary>,
    pub total_streets: usize,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub poi_summary: IndexMap<String, PoiRegionSummary>,
    pub total_poi: usize,
    pub total_data_points: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionSummary {
    fn finish(&mut self, start: DateTime<Local>) {
        let end = Local::now();
        self.total_data_points = self.administrative_units + self.total_streets + self.total_poi;
        self.end_time = Some(timestamp(end));
        self.duration = Some(format_duration(end - start));
    }
}

pub struct ExtractionPipeline<'a> {
    ctx: ExtractContext<'a>,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(ctx: ExtractContext<'a>) -> Self {
        Self { ctx }
    }

    /// Run the selected phases over `regions`.
    ///
    /// Region-level failures are recorded in the summary. Anything else
    /// stops the run and writes `extraction_failed.json`.
    pub async fn run(&self, phases: &[Phase], regions: &[String]) -> Result<ExtractionSummary> {
        let start = Local::now();
        info!(
            "Starting {} OSM data extraction for {} regions",
            self.ctx.config.global.country,
            regions.len()
        );

        let mut summary = ExtractionSummary {
            start_time: timestamp(start),
            project: format!("{} OSM Data Extraction", self.ctx.config.global.country),
            regions_processed: regions.to_vec(),
            ..Default::default()
        };

        match self.run_phases(phases, regions, &mut summary).await {
            Ok(()) => {
                summary.finish(start);
                save_json(&summary, &self.ctx.layout.file("complete_extraction_summary.json"))?;
                log_summary(&summary);
                Ok(summary)
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                summary.error = Some(e.to_string());
                summary.finish(start);
                save_json(&summary, &self.ctx.layout.file("extraction_failed.json"))?;
                Err(e)
            }
        }
    }

    async fn run_phases(
        &self,
        phases: &[Phase],
        regions: &[String],
        summary: &mut ExtractionSummary,
    ) -> Result<()> {
        self.ctx.layout.create()?;

        for (i, phase) in phases.iter().enumerate() {
            if i > 0 {
                pause(self.ctx.config.delays.phase_secs).await;
            }
            match phase {
                Phase::Administrative => {
                    info!("Step {}: extracting administrative boundaries", i + 1);
                    let boundaries = AdminExtractor::new(self.ctx)
                        .extract_country_or_empty()
                        .await;
                    summary.administrative_units = boundaries.len();
                }
                Phase::Streets => {
                    info!("Step {}: extracting street networks", i + 1);
                    let streets = StreetExtractor::new(self.ctx).extract_all(regions).await?;
                    summary.total_streets = total_streets(&streets);
                    summary.streets_summary = streets;
                }
                Phase::Poi => {
                    info!("Step {}: extracting points of interest", i + 1);
                    let pois = PoiExtractor::new(self.ctx).extract_all(regions).await?;
                    summary.total_poi = total_pois(&pois);
                    summary.poi_summary = pois;
                }
            }
        }

        Ok(())
    }
}

fn log_summary(summary: &ExtractionSummary) {
    info!("Extraction finished");
    info!("  Administrative units: {}", summary.administrative_units);
    info!("  Total streets: {}", summary.total_streets);
    info!("  Total POIs: {}", summary.total_poi);
    info!("  Total data points: {}", summary.total_data_points);
    if let Some(duration) = &summary.duration {
        info!("  Duration: {}", duration);
    }
}

/// `H:MM:SS`
pub fn format_duration(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
