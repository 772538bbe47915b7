//! Assigns streets to administrative buckets.

use hashbrown::HashSet;
use tracing::{debug, info, warn};

use super::index::HierarchyIndex;
use super::{UNKNOWN_DISTRICT, UNKNOWN_NEIGHBORHOOD};
use crate::models::{BoundariesByLevel, KnownNames, StreetRecord, StreetSummary};
use crate::regions::{BoundingBoxResolver, ProvinceResolver, OTHER_PROVINCE};

pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000;

/// Counters from one build run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Streets placed into a bucket
    pub processed: usize,
    /// Streets dropped for a missing coordinate
    pub skipped: usize,
}

/// Builds a [`HierarchyIndex`] from streets and boundaries.
pub struct HierarchyBuilder<R = BoundingBoxResolver<'static>> {
    resolver: R,
    limit: Option<usize>,
    progress_interval: usize,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new(BoundingBoxResolver::default())
    }
}

impl<R: ProvinceResolver> HierarchyBuilder<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            limit: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Only consider the first `limit` streets
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn build(
        &self,
        streets: &[StreetRecord],
        boundaries: &BoundariesByLevel,
    ) -> (HierarchyIndex, BuildStats) {
        info!("Building administrative hierarchy...");

        let known = boundaries.known_names();
        debug!(
            "Known names: {} provinces, {} districts, {} neighborhoods",
            known.provinces.len(),
            known.districts.len(),
            known.neighborhoods.len()
        );

        let streets = match self.limit {
            Some(limit) if limit < streets.len() => {
                info!("Limiting to the first {} of {} streets", limit, streets.len());
                &streets[..limit]
            }
            _ => streets,
        };

        let mut index = HierarchyIndex::new();
        let mut stats = BuildStats::default();
        let mut reported: HashSet<String> = HashSet::new();

        for street in streets {
            let Some(center) = street.center() else {
                stats.skipped += 1;
                continue;
            };

            let province = self.resolver.resolve(center.lat, center.lon);
            check_known_province(&known, province, &mut reported);

            index.insert(
                province,
                UNKNOWN_DISTRICT,
                UNKNOWN_NEIGHBORHOOD,
                StreetSummary::new(street, center),
            );
            stats.processed += 1;

            if stats.processed % self.progress_interval == 0 {
                info!("Processed {} streets...", stats.processed);
            }
        }

        info!(
            "Placed {} streets into {} provinces ({} without coordinates skipped)",
            stats.processed,
            index.province_count(),
            stats.skipped
        );

        (index, stats)
    }
}

/// Report a resolved province missing from the loaded boundaries, once per name
fn check_known_province(known: &KnownNames<'_>, province: &str, reported: &mut HashSet<String>) {
    if province == OTHER_PROVINCE || known.provinces.contains(province) {
        return;
    }
    if reported.insert(province.to_string()) {
        warn!(
            "Province '{}' is not among the loaded province boundaries",
            province
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdminLevel, BoundaryRecord};
    use crate::regions::RegionBounds;
    use std::collections::BTreeMap;

    fn street(id: i64, lat: Option<f64>, lon: Option<f64>) -> StreetRecord {
        StreetRecord {
            id,
            name: format!("Sokak {}", id),
            highway_type: "residential".to_string(),
            center_lat: lat,
            center_lon: lon,
            ..Default::default()
        }
    }

    fn boundaries(provinces: &[&str]) -> BoundariesByLevel {
        let mut boundaries = BoundariesByLevel::default();
        for (i, name) in provinces.iter().enumerate() {
            boundaries.push(BoundaryRecord {
                id: Some(i as i64),
                name: name.to_string(),
                level: AdminLevel::Province,
                tags: BTreeMap::new(),
            });
        }
        boundaries
    }

    #[test]
    fn test_ankara_street() {
        let streets = vec![StreetRecord {
            surface: Some("asphalt".to_string()),
            ..street(7, Some(39.9), Some(32.8))
        }];
        let (index, stats) = HierarchyBuilder::default().build(&streets, &boundaries(&["Ankara"]));

        assert_eq!(stats, BuildStats { processed: 1, skipped: 0 });
        let bucket = index
            .bucket("Ankara", UNKNOWN_DISTRICT, UNKNOWN_NEIGHBORHOOD)
            .unwrap();
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].id, 7);
        assert_eq!(bucket[0].surface, "asphalt");
        assert_eq!(bucket[0].lanes, "");
        assert_eq!(bucket[0].coordinates.lat, 39.9);
    }

    #[test]
    fn test_origin_goes_to_other_province() {
        let streets = vec![street(1, Some(0.0), Some(0.0))];
        let (index, stats) = HierarchyBuilder::default().build(&streets, &boundaries(&[]));
        assert_eq!(stats.processed, 1);
        assert_eq!(index.province_street_count(OTHER_PROVINCE), 1);
    }

    #[test]
    fn test_missing_coordinate_is_skipped() {
        let streets = vec![
            street(1, None, Some(32.8)),
            street(2, Some(39.9), None),
            street(3, Some(41.0), Some(29.0)),
        ];
        let (index, stats) = HierarchyBuilder::default().build(&streets, &boundaries(&[]));
        assert_eq!(stats, BuildStats { processed: 1, skipped: 2 });
        assert_eq!(index.street_count(), 1);
        assert_eq!(index.province_count(), 1);
        assert!(index.province("Ankara").is_none());
    }

    #[test]
    fn test_every_street_lands_in_exactly_one_bucket() {
        let streets: Vec<StreetRecord> = (0..200)
            .map(|i| {
                let lat = 36.0 + (i as f64) * 0.03;
                let lon = 26.0 + (i as f64) * 0.08;
                street(i, Some(lat), Some(lon))
            })
            .collect();
        let (index, stats) = HierarchyBuilder::default().build(&streets, &boundaries(&[]));

        assert_eq!(index.street_count(), streets.len());
        assert_eq!(stats.processed, streets.len());

        let mut seen: Vec<i64> = index
            .provinces()
            .flat_map(|(_, districts)| districts.values())
            .flat_map(|neighborhoods| neighborhoods.values())
            .flatten()
            .map(|s| s.id)
            .collect();
        seen.sort();
        assert_eq!(seen, (0..200).collect::<Vec<_>>());

        for (province, districts) in index.provinces() {
            assert_eq!(districts.len(), 1);
            let neighborhoods = &districts[UNKNOWN_DISTRICT];
            assert_eq!(neighborhoods.len(), 1);
            for summary in &neighborhoods[UNKNOWN_NEIGHBORHOOD] {
                let c = summary.coordinates;
                assert_eq!(crate::regions::resolve_province(c.lat, c.lon), province);
            }
        }
    }

    #[test]
    fn test_limit_applies_before_filtering() {
        let streets = vec![
            street(1, None, None),
            street(2, Some(39.9), Some(32.8)),
            street(3, Some(41.0), Some(29.0)),
        ];
        let (index, stats) = HierarchyBuilder::default()
            .with_limit(Some(2))
            .build(&streets, &boundaries(&[]));
        assert_eq!(stats, BuildStats { processed: 1, skipped: 1 });
        assert_eq!(index.province_street_count("Ankara"), 1);
        assert!(index.province("İstanbul").is_none());

        let (index, _) = HierarchyBuilder::default()
            .with_limit(Some(50))
            .build(&streets, &boundaries(&[]));
        assert_eq!(index.street_count(), 2);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let streets = vec![street(5, Some(39.9), Some(32.8)), street(5, Some(39.9), Some(32.8))];
        let (index, _) = HierarchyBuilder::default().build(&streets, &boundaries(&[]));
        assert_eq!(index.province_street_count("Ankara"), 2);
    }

    #[test]
    fn test_custom_resolver() {
        let table = [RegionBounds::new("Everywhere", (-90.0, 90.0), (-180.0, 180.0))];
        let builder = HierarchyBuilder::new(BoundingBoxResolver::new(&table));
        let streets = vec![street(1, Some(0.0), Some(0.0)), street(2, Some(39.9), Some(32.8))];
        let (index, _) = builder.build(&streets, &boundaries(&[]));
        assert_eq!(index.province_count(), 1);
        assert_eq!(index.province_street_count("Everywhere"), 2);
    }

    #[test]
    fn test_unknown_province_reported_once() {
        let known = boundaries(&["Ankara"]);
        let names = known.known_names();
        let mut reported = HashSet::new();
        check_known_province(&names, "Ankara", &mut reported);
        check_known_province(&names, OTHER_PROVINCE, &mut reported);
        check_known_province(&names, "Konya", &mut reported);
        check_known_province(&names, "Konya", &mut reported);
        assert_eq!(reported.len(), 1);
        assert!(reported.contains("Konya"));
    }
}
