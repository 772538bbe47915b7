//! Overpass-backed extraction of boundaries, streets and POIs per region.

pub mod admin;
pub mod pipeline;
pub mod poi;
pub mod streets;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::Config;
use crate::output::OutputLayout;
use crate::overpass::OverpassClient;

pub use admin::AdminExtractor;
pub use pipeline::{ExtractionPipeline, ExtractionSummary, Phase};
pub use poi::{PoiExtractor, PoiRegionSummary};
pub use streets::{StreetExtractor, StreetRegionSummary};

/// Shared state for the extractors
#[derive(Clone, Copy)]
pub struct ExtractContext<'a> {
    pub client: &'a OverpassClient,
    pub config: &'a Config,
    pub layout: &'a OutputLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionStatus {
    Success,
    Failed,
}

/// Non-empty tag value
pub(crate) fn tag(tags: &BTreeMap<String, String>, key: &str) -> Option<String> {
    tags.get(key).filter(|v| !v.is_empty()).cloned()
}

pub(crate) async fn pause(secs: u64) {
    if secs > 0 {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}
