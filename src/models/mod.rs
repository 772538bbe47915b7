//! Core data models shared by the extractors and the hierarchy builder.

pub mod admin;
mod de;
pub mod poi;
pub mod street;

pub use admin::{
    AdminLevel, AdministrativeFile, BoundariesByLevel, BoundaryEntry, BoundaryRecord, KnownNames,
    RelationMember,
};
pub use poi::{OsmType, PoiFile, PoiRecord};
pub use street::{Coordinates, StreetFile, StreetRecord, StreetSummary};
