use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::index::HierarchyIndex;
use crate::error::Result;
use crate::output::{now, save_json};

pub const HIERARCHY_METHOD: &str = "Hierarchical organization by coordinates";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyStatistics {
    pub total_provinces: usize,
    pub total_streets: usize,
}

/// The written hierarchy artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyDocument {
    pub extracted_at: String,
    pub method: String,
    pub statistics: HierarchyStatistics,
    pub hierarchy: HierarchyIndex,
}

impl HierarchyDocument {
    pub fn new(hierarchy: HierarchyIndex, extracted_at: String) -> Self {
        let statistics = HierarchyStatistics {
            total_provinces: hierarchy.province_count(),
            total_streets: hierarchy.street_count(),
        };
        Self {
            extracted_at,
            method: HIERARCHY_METHOD.to_string(),
            statistics,
            hierarchy,
        }
    }

    /// Log per-province street counts, alphabetically
    pub fn log_breakdown(&self) {
        info!(
            "Hierarchy: {} provinces, {} streets",
            self.statistics.total_provinces, self.statistics.total_streets
        );
        for (province, count) in self.hierarchy.province_breakdown() {
            info!("  {}: {} streets", province, count);
        }
    }
}

/// Wrap the index with statistics and a timestamp, then write it to `path`
pub fn save_hierarchy(hierarchy: HierarchyIndex, path: &Path) -> Result<HierarchyDocument> {
    let document = HierarchyDocument::new(hierarchy, now());
    save_json(&document, path)?;
    info!("Saved hierarchy to {}", path.display());
    document.log_breakdown();
    Ok(document)
}
