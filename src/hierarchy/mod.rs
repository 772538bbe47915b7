//! Street hierarchy: province → district → neighborhood.
//!
//! Boundary records carry no geometry, so only the province level is
//! resolved (by bounding box). District and neighborhood are always the
//! sentinel names below.

mod builder;
mod document;
mod index;

pub use builder::{BuildStats, HierarchyBuilder, DEFAULT_PROGRESS_INTERVAL};
pub use document::{save_hierarchy, HierarchyDocument, HierarchyStatistics, HIERARCHY_METHOD};
pub use index::{DistrictBuckets, HierarchyIndex, NeighborhoodBuckets};

pub const UNKNOWN_DISTRICT: &str = "Unknown District";
pub const UNKNOWN_NEIGHBORHOOD: &str = "Unknown Neighborhood";
