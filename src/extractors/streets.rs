use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{pause, tag, ExtractContext, RegionStatus};
use crate::error::Result;
use crate::models::{Coordinates, StreetFile, StreetRecord};
use crate::output::{now, save_json};
use crate::overpass::{queries, OverpassResult, Way};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetRegionSummary {
    pub streets_count: usize,
    pub status: RegionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Named street extraction per region
pub struct StreetExtractor<'a> {
    ctx: ExtractContext<'a>,
}

impl<'a> StreetExtractor<'a> {
    pub fn new(ctx: ExtractContext<'a>) -> Self {
        Self { ctx }
    }

    pub async fn extract_region(&self, region: &str) -> Result<Vec<StreetRecord>> {
        info!("Extracting streets for {}", region);

        let result = self
            .ctx
            .client
            .query(&queries::region_streets(region))
            .await?;

        let streets: Vec<StreetRecord> = result
            .ways()
            .iter()
            .map(|way| street_from_way(way, &result))
            .collect();

        let file = StreetFile {
            region: Some(region.to_string()),
            city: None,
            extracted_at: Some(now()),
            total_count: Some(streets.len()),
            streets,
        };
        save_json(&file, &self.ctx.layout.streets(region))?;

        info!("{}: {} streets saved", region, file.streets.len());
        Ok(file.streets)
    }

    /// Extract every region in turn; failures are recorded, never raised
    pub async fn extract_all(
        &self,
        regions: &[String],
    ) -> Result<IndexMap<String, StreetRegionSummary>> {
        info!("Starting street extraction for {} regions", regions.len());

        let mut summary = IndexMap::new();
        for (i, region) in regions.iter().enumerate() {
            let entry = match self.extract_region(region).await {
                Ok(streets) => StreetRegionSummary {
                    streets_count: streets.len(),
                    status: RegionStatus::Success,
                    error: None,
                },
                Err(e) => {
                    error!("Failed to extract streets for {}: {}", region, e);
                    StreetRegionSummary {
                        streets_count: 0,
                        status: RegionStatus::Failed,
                        error: Some(e.to_string()),
                    }
                }
            };
            summary.insert(region.clone(), entry);

            if i + 1 < regions.len() {
                pause(self.ctx.config.delays.region_secs).await;
            }
        }

        save_json(&summary, &self.ctx.layout.file("streets_extraction_summary.json"))?;
        info!(
            "Street extraction completed: {} streets total",
            total_streets(&summary)
        );

        Ok(summary)
    }
}

pub fn total_streets(summary: &IndexMap<String, StreetRegionSummary>) -> usize {
    summary.values().map(|s| s.streets_count).sum()
}

/// Build a street record from a way and the nodes returned with it
pub fn street_from_way(way: &Way, result: &OverpassResult) -> StreetRecord {
    let geometry: Vec<Coordinates> = result.way_geometry(way);
    let mut street = StreetRecord {
        id: way.id,
        name: way.tags.get("name").cloned().unwrap_or_default(),
        highway_type: way.tags.get("highway").cloned().unwrap_or_default(),
        postal_code: tag(&way.tags, "postal_code"),
        lanes: tag(&way.tags, "lanes"),
        maxspeed: tag(&way.tags, "maxspeed"),
        surface: tag(&way.tags, "surface"),
        lit: tag(&way.tags, "lit"),
        oneway: tag(&way.tags, "oneway"),
        bridge: tag(&way.tags, "bridge"),
        tunnel: tag(&way.tags, "tunnel"),
        nodes_count: Some(way.nodes.len()),
        full_tags: way.tags.clone(),
        ..Default::default()
    };
    street.set_center(Coordinates::mean(&geometry));
    street.geometry = geometry;
    street
}
