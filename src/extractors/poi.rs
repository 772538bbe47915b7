use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{pause, tag, ExtractContext, RegionStatus};
use crate::config::PoiCategoryConfig;
use crate::error::Result;
use crate::models::PoiRecord;
use crate::output::save_json;
use crate::overpass::{queries, OverpassResult, Tagged};

/// Category name -> POIs, in configured order
pub type RegionPois = IndexMap<String, Vec<PoiRecord>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiRegionSummary {
    pub total_pois: usize,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub categories: IndexMap<String, usize>,
    pub status: RegionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Point-of-interest extraction per region and category
pub struct PoiExtractor<'a> {
    ctx: ExtractContext<'a>,
}

impl<'a> PoiExtractor<'a> {
    pub fn new(ctx: ExtractContext<'a>) -> Self {
        Self { ctx }
    }

    /// Run every filter of one category. A failed filter is logged and
    /// skipped; the rest of the category still runs.
    pub async fn extract_category(
        &self,
        region: &str,
        category: &PoiCategoryConfig,
    ) -> Vec<PoiRecord> {
        let mut pois = Vec::new();

        for filter in &category.filters {
            match self
                .ctx
                .client
                .query(&queries::region_poi(region, filter))
                .await
            {
                Ok(result) => {
                    let before = pois.len();
                    pois.extend(pois_from_result(&result, &category.name, filter));
                    info!(
                        "  - {}/{}/{}: {} POIs",
                        region,
                        category.name,
                        filter,
                        pois.len() - before
                    );
                }
                Err(e) => {
                    error!("Error in {}/{}/{}: {}", region, category.name, filter, e);
                }
            }
            pause(self.ctx.config.delays.filter_secs).await;
        }

        pois
    }

    /// All configured categories for one region, written to `<region>_poi.json`
    pub async fn extract_region(&self, region: &str) -> Result<RegionPois> {
        info!("Extracting POIs for {}", region);

        let mut region_pois = RegionPois::new();
        for category in &self.ctx.config.poi_categories {
            let pois = self.extract_category(region, category).await;
            info!("{}/{}: {} POIs", region, category.name, pois.len());
            region_pois.insert(category.name.clone(), pois);
            pause(self.ctx.config.delays.category_secs).await;
        }

        save_json(&region_pois, &self.ctx.layout.poi(region))?;
        info!("{}: {} total POIs saved", region, count_pois(&region_pois));

        Ok(region_pois)
    }

    pub async fn extract_all(
        &self,
        regions: &[String],
    ) -> Result<IndexMap<String, PoiRegionSummary>> {
        info!("Starting POI extraction for {} regions", regions.len());

        let mut summary = IndexMap::new();
        for (i, region) in regions.iter().enumerate() {
            let entry = match self.extract_region(region).await {
                Ok(region_pois) => PoiRegionSummary {
                    total_pois: count_pois(&region_pois),
                    categories: region_pois
                        .iter()
                        .map(|(name, pois)| (name.clone(), pois.len()))
                        .collect(),
                    status: RegionStatus::Success,
                    error: None,
                },
                Err(e) => {
                    error!("Failed to extract POIs for {}: {}", region, e);
                    PoiRegionSummary {
                        total_pois: 0,
                        categories: IndexMap::new(),
                        status: RegionStatus::Failed,
                        error: Some(e.to_string()),
                    }
                }
            };
            summary.insert(region.clone(), entry);

            if i + 1 < regions.len() {
                pause(self.ctx.config.delays.region_secs).await;
            }
        }

        save_json(&summary, &self.ctx.layout.file("poi_extraction_summary.json"))?;
        info!("POI extraction completed: {} POIs total", total_pois(&summary));

        Ok(summary)
    }
}

fn count_pois(region_pois: &RegionPois) -> usize {
    region_pois.values().map(Vec::len).sum()
}

pub fn total_pois(summary: &IndexMap<String, PoiRegionSummary>) -> usize {
    summary.values().map(|s| s.total_pois).sum()
}

/// Every tagged element in a filter's result, as POIs of `category`
pub fn pois_from_result(result: &OverpassResult, category: &str, filter: &str) -> Vec<PoiRecord> {
    result
        .tagged()
        .map(|element| poi_from_element(element, result, category, filter))
        .collect()
}

fn poi_from_element(
    element: Tagged<'_>,
    result: &OverpassResult,
    category: &str,
    filter: &str,
) -> PoiRecord {
    let tags = element.tags();
    let mut poi = PoiRecord::new(element.osm_type(), element.id(), category);
    poi.apply_tags(|key| tags.get(key).map(String::as_str));
    poi.subcategory = Some(filter.to_string());
    poi.amenity = tag(tags, "amenity");
    poi.city = tag(tags, "addr:city");
    poi.coordinates = result.element_center(element);
    poi.full_tags = tags.clone();
    poi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OsmType;
    use crate::overpass::OverpassResponse;

    fn result() -> OverpassResult {
        let response: OverpassResponse = serde_json::from_str(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 39.93, "lon": 32.86,
                 "tags": {"amenity": "hospital", "name": "Şehir Hastanesi", "addr:city": "Ankara", "phone": "+90 312 000 0000"}},
                {"type": "way", "id": 2, "nodes": [10, 11],
                 "tags": {"amenity": "hospital", "name": "Devlet Hastanesi"}},
                {"type": "relation", "id": 3, "members": [], "tags": {"amenity": "hospital"}},
                {"type": "node", "id": 10, "lat": 39.0, "lon": 32.0},
                {"type": "node", "id": 11, "lat": 39.2, "lon": 32.2}
            ]}"#,
        )
        .unwrap();
        OverpassResult::from_response(response)
    }

    #[test]
    fn test_pois_from_result() {
        let pois = pois_from_result(&result(), "healthcare", "amenity=hospital");
        assert_eq!(pois.len(), 3);

        assert_eq!(pois[0].osm_type, OsmType::Node);
        assert_eq!(pois[0].name, "Şehir Hastanesi");
        assert_eq!(pois[0].city.as_deref(), Some("Ankara"));
        assert_eq!(pois[0].subcategory.as_deref(), Some("amenity=hospital"));
        assert_eq!(pois[0].coordinates.unwrap().lat, 39.93);

        let way_center = pois[1].coordinates.unwrap();
        assert!((way_center.lat - 39.1).abs() < 1e-9);
        assert_eq!(pois[1].osm_type, OsmType::Way);

        assert_eq!(pois[2].osm_type, OsmType::Relation);
        assert!(pois[2].coordinates.is_none());
        assert_eq!(pois[2].name, "");
    }

    #[test]
    fn test_unresolved_coordinates_serialize_as_null() {
        let pois = pois_from_result(&result(), "healthcare", "amenity=hospital");
        let json = serde_json::to_value(&pois[2]).unwrap();
        assert!(json["coordinates"].is_null());
        assert_eq!(json["type"], "relation");
    }
}
