//! Street records and the summaries stored in the hierarchy.

use geo::{Centroid, MultiPoint, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::de;

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Arithmetic mean of the points, `None` for an empty slice
    pub fn mean(points: &[Coordinates]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let multi_point: MultiPoint<f64> = points
            .iter()
            .map(|c| Point::new(c.lon, c.lat))
            .collect::<Vec<_>>()
            .into();
        multi_point
            .centroid()
            .map(|p| Coordinates::new(p.y(), p.x()))
    }
}

/// A named highway way with its centroid.
///
/// Attribute tags are kept as free text; absent tags stay `None` and are
/// omitted when written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreetRecord {
    pub id: i64,

    #[serde(default, deserialize_with = "de::text")]
    pub name: String,

    /// Value of the `highway` tag
    #[serde(default, deserialize_with = "de::text")]
    pub highway_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default)]
    pub center_lat: Option<f64>,

    #[serde(default)]
    pub center_lon: Option<f64>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub surface: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub lanes: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub maxspeed: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub oneway: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub lit: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub bridge: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub tunnel: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geometry: Vec<Coordinates>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub full_tags: BTreeMap<String, String>,
}

impl StreetRecord {
    /// The centroid, only when both coordinates are present
    pub fn center(&self) -> Option<Coordinates> {
        match (self.center_lat, self.center_lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    pub fn set_center(&mut self, center: Option<Coordinates>) {
        self.center_lat = center.map(|c| c.lat);
        self.center_lon = center.map(|c| c.lon);
    }
}

/// Top-level shape of a streets artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetFile {
    /// Region the streets were queried for (Overpass)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// City the streets were grouped under (PBF)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,

    pub streets: Vec<StreetRecord>,
}

/// Displayable street fields stored in a hierarchy bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetSummary {
    pub id: i64,
    pub name: String,
    pub highway_type: String,
    pub coordinates: Coordinates,
    pub surface: String,
    pub lanes: String,
    pub maxspeed: String,
    pub oneway: String,
    pub lit: String,
}

impl StreetSummary {
    pub fn new(street: &StreetRecord, coordinates: Coordinates) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            id: street.id,
            name: street.name.clone(),
            highway_type: street.highway_type.clone(),
            coordinates,
            surface: text(&street.surface),
            lanes: text(&street.lanes),
            maxspeed: text(&street.maxspeed),
            oneway: text(&street.oneway),
            lit: text(&street.lit),
        }
    }
}
