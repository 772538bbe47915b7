//! Streets, POIs and boundaries from a local `.osm.pbf` file.

use anyhow::{Context, Result};
use hashbrown::HashSet;
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use osmpbfreader::{OsmObj, OsmPbfReader};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::classify::{boundary_from_relation, poi_from_node, street_from_way};
use super::nodes::NodeStore;
use crate::config::PbfConfig;
use crate::models::{
    AdministrativeFile, BoundaryEntry, Coordinates, PoiFile, PoiRecord, StreetFile, StreetRecord,
};
use crate::output::{now, save_json, OutputLayout};

pub const PBF_METHOD: &str = "PBF file parsing (osmpbfreader)";

/// Object counters for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCounts {
    pub nodes: usize,
    pub ways: usize,
    pub relations: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PbfStatistics {
    pub total_nodes: usize,
    pub total_ways: usize,
    pub total_relations: usize,
    pub total_streets: usize,
    pub total_pois: usize,
    pub cities_processed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityCounts {
    pub streets: usize,
    pub pois: usize,
}

/// Contents of `extraction_summary.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PbfSummary {
    pub extraction_date: String,
    pub source_file: PathBuf,
    pub method: String,
    pub statistics: PbfStatistics,
    pub cities: IndexMap<String, CityCounts>,
}

/// A street waiting for its node positions
struct PendingStreet {
    street: StreetRecord,
    nodes: Vec<i64>,
}

/// Everything collected by the first pass
#[derive(Default)]
pub struct Collected {
    pub counts: ScanCounts,
    pub boundaries: Vec<BoundaryEntry>,
    /// City -> category -> POIs
    pub pois: IndexMap<String, IndexMap<String, Vec<PoiRecord>>>,
    /// City -> resolved streets
    pub streets: IndexMap<String, Vec<StreetRecord>>,
    pub dropped_streets: usize,
}

impl Collected {
    pub fn street_count(&self) -> usize {
        self.streets.values().map(Vec::len).sum()
    }

    pub fn poi_count(&self) -> usize {
        self.pois
            .values()
            .flat_map(|categories| categories.values())
            .map(Vec::len)
            .sum()
    }
}

pub struct PbfExtractor<'a> {
    config: &'a PbfConfig,
    country_slug: &'a str,
}

impl<'a> PbfExtractor<'a> {
    pub fn new(config: &'a PbfConfig, country_slug: &'a str) -> Self {
        Self {
            config,
            country_slug,
        }
    }

    /// Scan `path` and write all artifacts into `layout`
    pub fn run(&self, path: &Path, layout: &OutputLayout) -> Result<PbfSummary> {
        info!("Reading PBF file: {}", path.display());
        layout.create()?;

        let collected = self.collect(path)?;
        let summary = self.write(path, &collected, layout)?;

        info!("Extraction complete");
        info!("  Nodes processed: {}", collected.counts.nodes);
        info!("  Ways processed: {}", collected.counts.ways);
        info!("  Relations processed: {}", collected.counts.relations);
        info!("  Streets: {}", summary.statistics.total_streets);
        info!("  POIs: {}", summary.statistics.total_pois);
        info!("  Cities: {}", summary.statistics.cities_processed);
        info!("Output directory: {}", layout.dir().display());

        Ok(summary)
    }

    /// Two passes: classify objects, then resolve street node positions
    pub fn collect(&self, path: &Path) -> Result<Collected> {
        let mut collected = Collected::default();
        let mut pending: Vec<PendingStreet> = Vec::new();
        let mut needed_nodes: HashSet<i64> = HashSet::new();
        let interval = self.config.progress_interval.max(1);
        let mut poi_total = 0usize;

        info!("Pass 1/2: Classifying objects...");
        let (mut reader, pb) = open_reader(path)?;
        for obj in reader.iter() {
            let obj = match obj {
                Ok(o) => o,
                Err(e) => {
                    warn!("Error reading OSM object: {}", e);
                    continue;
                }
            };
            match obj {
                OsmObj::Node(node) => {
                    collected.counts.nodes += 1;
                    if let Some(poi) = poi_from_node(&node, &self.config.poi_categories) {
                        let city = poi.city.clone().unwrap_or_default();
                        collected
                            .pois
                            .entry(city)
                            .or_default()
                            .entry(poi.category.clone())
                            .or_default()
                            .push(poi);
                        poi_total += 1;
                        if poi_total % interval == 0 {
                            info!("Processed {} POIs...", poi_total);
                        }
                    }
                }
                OsmObj::Way(way) => {
                    collected.counts.ways += 1;
                    if let Some(street) = street_from_way(&way) {
                        let nodes: Vec<i64> = way.nodes.iter().map(|n| n.0).collect();
                        needed_nodes.extend(nodes.iter().copied());
                        pending.push(PendingStreet { street, nodes });
                        if pending.len() % interval == 0 {
                            info!("Processed {} streets...", pending.len());
                        }
                    }
                }
                OsmObj::Relation(relation) => {
                    collected.counts.relations += 1;
                    if let Some(boundary) = boundary_from_relation(&relation) {
                        collected.boundaries.push(boundary);
                    }
                }
            }
        }
        pb.finish_and_clear();
        info!(
            "Found {} streets referencing {} nodes, {} POIs, {} boundaries",
            pending.len(),
            needed_nodes.len(),
            poi_total,
            collected.boundaries.len()
        );

        info!("Pass 2/2: Storing node coordinates...");
        let store = NodeStore::temporary()?;
        let (mut reader, pb) = open_reader(path)?;
        for obj in reader.iter() {
            if let Ok(OsmObj::Node(node)) = obj {
                if needed_nodes.contains(&node.id.0) {
                    store.insert(node.id.0, Coordinates::new(node.lat(), node.lon()))?;
                }
            }
        }
        store.flush()?;
        pb.finish_and_clear();
        info!("Stored {} node coordinates", store.len());

        for PendingStreet { mut street, nodes } in pending {
            let coords = store.resolve(&nodes)?;
            match Coordinates::mean(&coords) {
                Some(center) => {
                    street.set_center(Some(center));
                    let city = street.city.clone().unwrap_or_default();
                    collected.streets.entry(city).or_default().push(street);
                }
                None => collected.dropped_streets += 1,
            }
        }
        if collected.dropped_streets > 0 {
            warn!(
                "Dropped {} streets without resolvable nodes",
                collected.dropped_streets
            );
        }

        Ok(collected)
    }

    fn write(
        &self,
        path: &Path,
        collected: &Collected,
        layout: &OutputLayout,
    ) -> Result<PbfSummary> {
        let extracted_at = now();

        info!("Saving administrative boundaries...");
        let admin = AdministrativeFile::new(extracted_at.clone(), collected.boundaries.clone());
        save_json(&admin, &layout.administrative(self.country_slug))?;
        info!("  Saved {} boundaries", collected.boundaries.len());

        info!("Saving streets by city...");
        let mut total_streets = 0;
        for (city, streets) in &collected.streets {
            let file = StreetFile {
                region: None,
                city: Some(city.clone()),
                extracted_at: Some(extracted_at.clone()),
                total_count: Some(streets.len()),
                streets: streets.clone(),
            };
            save_json(&file, &layout.streets(city))?;
            info!("  {}: {} streets", city, streets.len());
            total_streets += streets.len();
        }

        info!("Saving POIs by city...");
        let mut total_pois = 0;
        let mut city_pois: IndexMap<&str, usize> = IndexMap::new();
        for (city, categories) in &collected.pois {
            let pois: Vec<PoiRecord> = categories.values().flatten().cloned().collect();
            if pois.is_empty() {
                continue;
            }
            let file = PoiFile {
                city: city.clone(),
                extracted_at: extracted_at.clone(),
                total_count: pois.len(),
                pois,
            };
            save_json(&file, &layout.poi(city))?;
            info!("  {}: {} POIs", city, file.total_count);
            total_pois += file.total_count;
            city_pois.insert(city.as_str(), file.total_count);
        }

        let summary = PbfSummary {
            extraction_date: extracted_at,
            source_file: path.to_path_buf(),
            method: PBF_METHOD.to_string(),
            statistics: PbfStatistics {
                total_nodes: collected.counts.nodes,
                total_ways: collected.counts.ways,
                total_relations: collected.counts.relations,
                total_streets,
                total_pois,
                cities_processed: collected.streets.len(),
            },
            cities: collected
                .streets
                .iter()
                .map(|(city, streets)| {
                    let counts = CityCounts {
                        streets: streets.len(),
                        pois: city_pois.get(city.as_str()).copied().unwrap_or(0),
                    };
                    (city.clone(), counts)
                })
                .collect(),
        };
        save_json(&summary, &layout.file("extraction_summary.json"))?;

        Ok(summary)
    }
}

type PbfReader = OsmPbfReader<indicatif::ProgressBarIter<BufReader<File>>>;

fn open_reader(path: &Path) -> Result<(PbfReader, ProgressBar)> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file.metadata().map(|m| m.len()).unwrap_or(0);

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let reader = OsmPbfReader::new(pb.wrap_read(BufReader::new(file)));
    Ok((reader, pb))
}
