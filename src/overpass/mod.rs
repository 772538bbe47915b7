//! Overpass API access.

mod client;
pub mod queries;
mod types;

pub use client::{backoff_delay, OverpassClient};
pub use types::{Element, Node, OverpassResponse, OverpassResult, Relation, Tagged, Way};
