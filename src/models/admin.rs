//! Administrative boundary types and their grouping by level.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::de;

/// OSM admin_level mapping for the levels the address hierarchy uses.
/// See: https://wiki.openstreetmap.org/wiki/Tag:boundary%3Dadministrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    /// Country (admin_level=2)
    Country,
    /// Province / il (admin_level=4)
    Province,
    /// District / ilçe (admin_level=6)
    District,
    /// Neighborhood / mahalle (admin_level=8)
    Neighborhood,
}

impl AdminLevel {
    /// Convert an OSM admin_level tag value to an AdminLevel
    pub fn from_osm_level(level: &str) -> Option<Self> {
        match level.trim() {
            "2" => Some(AdminLevel::Country),
            "4" => Some(AdminLevel::Province),
            "6" => Some(AdminLevel::District),
            "8" => Some(AdminLevel::Neighborhood),
            _ => None,
        }
    }

    /// Get the OSM admin_level tag value
    pub fn to_osm_level(&self) -> &'static str {
        match self {
            AdminLevel::Country => "2",
            AdminLevel::Province => "4",
            AdminLevel::District => "6",
            AdminLevel::Neighborhood => "8",
        }
    }

    /// Get all admin levels in hierarchical order (country first)
    pub fn all() -> &'static [AdminLevel] {
        &[
            AdminLevel::Country,
            AdminLevel::Province,
            AdminLevel::District,
            AdminLevel::Neighborhood,
        ]
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            AdminLevel::Country => "country",
            AdminLevel::Province => "province",
            AdminLevel::District => "district",
            AdminLevel::Neighborhood => "neighborhood",
        }
    }
}

/// Relation member reference as reported by Overpass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMember {
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(rename = "ref")]
    pub member_ref: i64,
    #[serde(default)]
    pub role: String,
}

/// A boundary as it is stored in an administrative JSON artifact.
///
/// Every field except the level and name is optional so files written by
/// either extractor (or by hand) load through the same type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEntry {
    /// OSM relation ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "de::text")]
    pub name: String,

    /// Raw admin_level tag, e.g. "4"
    #[serde(default, deserialize_with = "de::text")]
    pub admin_level: String,

    /// Human label for the level, e.g. "province"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_type: Option<String>,

    /// Relation `type` tag (boundary / multipolygon)
    #[serde(
        rename = "type",
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub relation_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub boundary_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub population: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub wikidata: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub wikipedia: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<RelationMember>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// Top-level shape of an administrative boundaries artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdministrativeFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,

    pub boundaries: Vec<BoundaryEntry>,
}

impl AdministrativeFile {
    pub fn new(extracted_at: String, boundaries: Vec<BoundaryEntry>) -> Self {
        Self {
            extracted_at: Some(extracted_at),
            total_count: Some(boundaries.len()),
            boundaries,
        }
    }
}

/// A boundary whose level is one of the four hierarchy levels.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    pub id: Option<i64>,
    /// May be empty; such records are kept but never used as lookup names
    pub name: String,
    pub level: AdminLevel,
    pub tags: BTreeMap<String, String>,
}

impl BoundaryRecord {
    /// Returns `None` when the entry's level is not a hierarchy level
    pub fn from_entry(entry: BoundaryEntry) -> Option<Self> {
        let level = AdminLevel::from_osm_level(&entry.admin_level)?;
        Some(Self {
            id: entry.id,
            name: entry.name,
            level,
            tags: entry.tags,
        })
    }
}

/// Boundary records bucketed by admin level.
#[derive(Debug, Clone, Default)]
pub struct BoundariesByLevel {
    country: Vec<BoundaryRecord>,
    province: Vec<BoundaryRecord>,
    district: Vec<BoundaryRecord>,
    neighborhood: Vec<BoundaryRecord>,
}

impl BoundariesByLevel {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = BoundaryEntry>,
    {
        let mut by_level = Self::default();
        for record in entries.into_iter().filter_map(BoundaryRecord::from_entry) {
            by_level.push(record);
        }
        by_level
    }

    pub fn push(&mut self, record: BoundaryRecord) {
        match record.level {
            AdminLevel::Country => self.country.push(record),
            AdminLevel::Province => self.province.push(record),
            AdminLevel::District => self.district.push(record),
            AdminLevel::Neighborhood => self.neighborhood.push(record),
        }
    }

    /// All records at a level, including unnamed ones
    pub fn get(&self, level: AdminLevel) -> &[BoundaryRecord] {
        match level {
            AdminLevel::Country => &self.country,
            AdminLevel::Province => &self.province,
            AdminLevel::District => &self.district,
            AdminLevel::Neighborhood => &self.neighborhood,
        }
    }

    /// Distinct non-empty names at a level
    pub fn names(&self, level: AdminLevel) -> BTreeSet<&str> {
        self.get(level)
            .iter()
            .map(|b| b.name.as_str())
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn known_names(&self) -> KnownNames<'_> {
        KnownNames {
            provinces: self.names(AdminLevel::Province),
            districts: self.names(AdminLevel::District),
            neighborhoods: self.names(AdminLevel::Neighborhood),
        }
    }

    pub fn len(&self) -> usize {
        AdminLevel::all().iter().map(|l| self.get(*l).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Name lookup sets borrowed from a [`BoundariesByLevel`]
#[derive(Debug, Default)]
pub struct KnownNames<'a> {
    pub provinces: BTreeSet<&'a str>,
    pub districts: BTreeSet<&'a str>,
    pub neighborhoods: BTreeSet<&'a str>,
}
