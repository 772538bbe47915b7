//! osm-extract - OpenStreetMap extraction and street hierarchy building
//!
//! This library provides shared types and modules for the `extract`,
//! `extract-pbf` and `build-hierarchy` binaries.

pub mod config;
pub mod error;
pub mod extractors;
pub mod hierarchy;
pub mod loader;
pub mod logging;
pub mod models;
pub mod output;
pub mod overpass;
pub mod pbf;
pub mod regions;

pub use config::Config;
pub use error::{Error, Result};
pub use hierarchy::{HierarchyBuilder, HierarchyDocument, HierarchyIndex};
pub use models::{AdminLevel, BoundariesByLevel, StreetRecord, StreetSummary};
pub use regions::{resolve_province, ProvinceResolver};
