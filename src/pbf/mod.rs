//! Local `.osm.pbf` extraction.

pub mod classify;
mod extractor;
mod nodes;

pub use extractor::{
    CityCounts, Collected, PbfExtractor, PbfStatistics, PbfSummary, ScanCounts, PBF_METHOD,
};
pub use nodes::NodeStore;
