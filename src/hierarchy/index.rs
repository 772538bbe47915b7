//! Nested province → district → neighborhood street index.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::StreetSummary;

/// Neighborhood name → streets, in insertion order
pub type NeighborhoodBuckets = IndexMap<String, Vec<StreetSummary>>;

/// District name → neighborhoods
pub type DistrictBuckets = IndexMap<String, NeighborhoodBuckets>;

/// Three-level street index.
///
/// Levels are only created through [`HierarchyIndex::bucket_mut`], so a
/// level exists exactly when at least one street was placed under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HierarchyIndex {
    provinces: IndexMap<String, DistrictBuckets>,
}

impl HierarchyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the bucket for (province, district, neighborhood), creating
    /// missing levels on the way down.
    pub fn bucket_mut(
        &mut self,
        province: &str,
        district: &str,
        neighborhood: &str,
    ) -> &mut Vec<StreetSummary> {
        self.provinces
            .entry(province.to_string())
            .or_default()
            .entry(district.to_string())
            .or_default()
            .entry(neighborhood.to_string())
            .or_default()
    }

    pub fn insert(
        &mut self,
        province: &str,
        district: &str,
        neighborhood: &str,
        street: StreetSummary,
    ) {
        self.bucket_mut(province, district, neighborhood).push(street);
    }

    /// Lookup without creating anything
    pub fn bucket(
        &self,
        province: &str,
        district: &str,
        neighborhood: &str,
    ) -> Option<&[StreetSummary]> {
        self.provinces
            .get(province)?
            .get(district)?
            .get(neighborhood)
            .map(Vec::as_slice)
    }

    pub fn province(&self, province: &str) -> Option<&DistrictBuckets> {
        self.provinces.get(province)
    }

    pub fn provinces(&self) -> impl Iterator<Item = (&str, &DistrictBuckets)> {
        self.provinces.iter().map(|(name, d)| (name.as_str(), d))
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }

    /// Streets under one province across all districts and neighborhoods
    pub fn province_street_count(&self, province: &str) -> usize {
        self.provinces
            .get(province)
            .map(count_district_streets)
            .unwrap_or(0)
    }

    /// Total streets across every bucket
    pub fn street_count(&self) -> usize {
        self.provinces.values().map(count_district_streets).sum()
    }

    /// (province, street count) sorted by province name
    pub fn province_breakdown(&self) -> Vec<(&str, usize)> {
        let mut breakdown: Vec<(&str, usize)> = self
            .provinces
            .iter()
            .map(|(name, districts)| (name.as_str(), count_district_streets(districts)))
            .collect();
        breakdown.sort_by(|a, b| a.0.cmp(b.0));
        breakdown
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }
}

fn count_district_streets(districts: &DistrictBuckets) -> usize {
    districts
        .values()
        .flat_map(|neighborhoods| neighborhoods.values())
        .map(Vec::len)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, StreetRecord};

    fn summary(id: i64) -> StreetSummary {
        let street = StreetRecord {
            id,
            name: format!("Street {}", id),
            ..Default::default()
        };
        StreetSummary::new(&street, Coordinates::new(0.0, 0.0))
    }

    #[test]
    fn test_lookup_does_not_create_levels() {
        let index = HierarchyIndex::new();
        assert!(index.bucket("Ankara", "Çankaya", "Kızılay").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_insert_appends_in_order() {
        let mut index = HierarchyIndex::new();
        index.insert("Ankara", "D", "N", summary(2));
        index.insert("Ankara", "D", "N", summary(1));
        index.insert("Ankara", "D", "N", summary(2));

        let ids: Vec<i64> = index
            .bucket("Ankara", "D", "N")
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 2]);
        assert_eq!(index.street_count(), 3);
        assert_eq!(index.province_count(), 1);
    }

    #[test]
    fn test_breakdown_is_alphabetical() {
        let mut index = HierarchyIndex::new();
        index.insert("Konya", "D", "N", summary(1));
        index.insert("Adana", "D", "N", summary(2));
        index.insert("Konya", "D2", "N", summary(3));
        index.insert("Bursa", "D", "N", summary(4));

        let names: Vec<&str> = index.provinces().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Konya", "Adana", "Bursa"]);

        assert_eq!(
            index.province_breakdown(),
            vec![("Adana", 1), ("Bursa", 1), ("Konya", 2)]
        );
        assert_eq!(index.province_street_count("Konya"), 2);
        assert_eq!(index.province_street_count("Mersin"), 0);
    }

    #[test]
    fn test_serializes_as_plain_nested_map() {
        let mut index = HierarchyIndex::new();
        index.insert("Ankara", "Unknown District", "Unknown Neighborhood", summary(1));
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(
            json["Ankara"]["Unknown District"]["Unknown Neighborhood"][0]["id"],
            1
        );
    }
}
