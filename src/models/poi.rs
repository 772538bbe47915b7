//! Point-of-interest records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::street::Coordinates;

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
        }
    }
}

/// A point of interest in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    pub id: i64,

    #[serde(rename = "type")]
    pub osm_type: OsmType,

    #[serde(default)]
    pub name: String,

    /// Configured category, e.g. "healthcare"
    pub category: String,

    /// Tag filter that matched, e.g. "amenity=hospital"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Value of the `amenity` tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenity: Option<String>,

    /// Node position or the mean of a way's nodes; `null` when unresolved
    pub coordinates: Option<Coordinates>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub full_tags: BTreeMap<String, String>,
}

impl PoiRecord {
    /// Create a POI with minimal required fields
    pub fn new(osm_type: OsmType, id: i64, category: &str) -> Self {
        Self {
            id,
            osm_type,
            name: String::new(),
            category: category.to_string(),
            subcategory: None,
            amenity: None,
            coordinates: None,
            address: None,
            city: None,
            postal_code: None,
            postcode: None,
            operator: None,
            website: None,
            phone: None,
            full_tags: BTreeMap::new(),
        }
    }

    /// Fill the contact and address fields from a tag lookup
    pub fn apply_tags<'a, F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let owned = |key: &str| get(key).filter(|v| !v.is_empty()).map(str::to_string);
        self.name = owned("name").unwrap_or_default();
        self.address = owned("addr:street");
        self.postal_code = owned("postal_code");
        self.postcode = owned("addr:postcode");
        self.operator = owned("operator");
        self.website = owned("website");
        self.phone = owned("phone");
    }
}

/// Per-city POI artifact written by the PBF extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiFile {
    pub city: String,
    pub extracted_at: String,
    pub total_count: usize,
    pub pois: Vec<PoiRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_apply_tags() {
        let tags: HashMap<&str, &str> = [
            ("name", "Ankara Şehir Hastanesi"),
            ("addr:street", "Üniversiteler Mahallesi"),
            ("phone", ""),
            ("operator", "Sağlık Bakanlığı"),
        ]
        .into_iter()
        .collect();

        let mut poi = PoiRecord::new(OsmType::Way, 10, "healthcare");
        poi.apply_tags(|key| tags.get(key).copied());

        assert_eq!(poi.name, "Ankara Şehir Hastanesi");
        assert_eq!(poi.address.as_deref(), Some("Üniversiteler Mahallesi"));
        assert_eq!(poi.operator.as_deref(), Some("Sağlık Bakanlığı"));
        assert!(poi.phone.is_none());
        assert!(poi.website.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let poi = PoiRecord::new(OsmType::Node, 5, "education");
        let json = serde_json::to_value(&poi).unwrap();
        assert_eq!(json["type"], "node");
        assert!(json["coordinates"].is_null());
        assert!(json.get("phone").is_none());
    }
}
