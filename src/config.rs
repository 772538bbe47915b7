use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::output::OutputLayout;
use crate::pbf::classify::UNKNOWN_CITY;
use crate::regions::province_names;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub overpass: OverpassConfig,
    pub delays: DelayConfig,
    /// Regions (admin_level=4 area names) to extract, in processing order
    pub regions: Vec<String>,
    /// admin_level tag value -> label written as `admin_type`
    pub admin_levels: BTreeMap<String, String>,
    /// Overpass POI categories, in processing order
    pub poi_categories: Vec<PoiCategoryConfig>,
    pub pbf: PbfConfig,
    pub hierarchy: HierarchyConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GlobalConfig {
    pub output_dir: PathBuf,
    /// English country name used for the country-wide admin query
    pub country: String,
    /// Value written in file names for country-wide artifacts
    pub country_slug: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassConfig {
    pub url: String,
    pub user_agent: String,
    /// Server-side query timeout, also used for the HTTP request
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    /// Base wait after an HTTP 429
    pub rate_limit_delay_secs: u64,
}

/// Pauses between Overpass requests
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DelayConfig {
    pub filter_secs: u64,
    pub category_secs: u64,
    pub region_secs: u64,
    pub phase_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoiCategoryConfig {
    pub name: String,
    /// Overpass tag filters such as `amenity=hospital`
    pub filters: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PbfConfig {
    pub poi_categories: Vec<AmenityCategoryConfig>,
    pub progress_interval: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AmenityCategoryConfig {
    pub name: String,
    pub amenities: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HierarchyConfig {
    pub progress_interval: usize,
    /// Process only the first N streets
    pub limit: Option<usize>,
    /// City key of the streets artifact to read, `<name>_streets.json`
    pub streets_source: String,
}

impl HierarchyConfig {
    /// Streets file read when none is given on the command line
    pub fn streets_file(&self, layout: &OutputLayout) -> PathBuf {
        layout.streets(&self.streets_source)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.overpass.url)
            .with_context(|| format!("Invalid Overpass URL: {}", self.overpass.url))?;
        ensure!(
            self.overpass.max_retries >= 1,
            "overpass.max_retries must be at least 1"
        );
        ensure!(
            self.hierarchy.progress_interval > 0 && self.pbf.progress_interval > 0,
            "progress_interval must be positive"
        );
        for category in &self.poi_categories {
            ensure!(
                !category.filters.is_empty(),
                "POI category '{}' has no filters",
                category.name
            );
        }
        Ok(())
    }

    /// Label for an admin_level value, "unknown" if not configured
    pub fn admin_type(&self, admin_level: &str) -> &str {
        self.admin_levels
            .get(admin_level)
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}

impl OverpassConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_secs(self.rate_limit_delay_secs)
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data/processed"),
            country: "Turkey".to_string(),
            country_slug: "turkey".to_string(),
        }
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 600,
            max_retries: 3,
            retry_delay_secs: 30,
            rate_limit_delay_secs: 60,
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            filter_secs: 5,
            category_secs: 10,
            region_secs: 30,
            phase_secs: 60,
        }
    }
}

impl Default for PbfConfig {
    fn default() -> Self {
        let category = |name: &str, amenities: &[&str]| AmenityCategoryConfig {
            name: name.to_string(),
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
        };
        Self {
            poi_categories: vec![
                category(
                    "education",
                    &["school", "university", "college", "kindergarten"],
                ),
                category("healthcare", &["hospital", "clinic", "doctors", "pharmacy"]),
                category(
                    "government",
                    &["townhall", "police", "post_office", "courthouse"],
                ),
                category("religious", &["place_of_worship"]),
                category("commercial", &["bank", "atm", "supermarket", "marketplace"]),
                category(
                    "transportation",
                    &["bus_station", "ferry_terminal", "taxi", "fuel"],
                ),
            ],
            progress_interval: 10_000,
        }
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            progress_interval: 10_000,
            limit: None,
            streets_source: UNKNOWN_CITY.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            overpass: OverpassConfig::default(),
            delays: DelayConfig::default(),
            regions: default_regions(),
            admin_levels: default_admin_levels(),
            poi_categories: default_poi_categories(),
            pbf: PbfConfig::default(),
            hierarchy: HierarchyConfig::default(),
        }
    }
}

fn default_regions() -> Vec<String> {
    province_names().map(str::to_string).collect()
}

fn default_admin_levels() -> BTreeMap<String, String> {
    [
        ("1", "country"),
        ("2", "region"),
        ("4", "province"),
        ("6", "district"),
        ("8", "neighborhood"),
        ("10", "quarter"),
    ]
    .into_iter()
    .map(|(level, label)| (level.to_string(), label.to_string()))
    .collect()
}

fn default_poi_categories() -> Vec<PoiCategoryConfig> {
    let category = |name: &str, filters: &[&str], tags: &[&str]| PoiCategoryConfig {
        name: name.to_string(),
        filters: filters.iter().map(|f| f.to_string()).collect(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    };
    vec![
        category(
            "education",
            &[
                "amenity=university",
                "amenity=school",
                "amenity=college",
                "amenity=kindergarten",
            ],
            &["name", "operator", "capacity"],
        ),
        category(
            "healthcare",
            &[
                "amenity=hospital",
                "amenity=clinic",
                "amenity=pharmacy",
                "amenity=doctors",
            ],
            &["name", "healthcare", "beds"],
        ),
        category(
            "government",
            &[
                "amenity=townhall",
                "office=government",
                "amenity=courthouse",
            ],
            &["name", "government"],
        ),
        category(
            "religious",
            &[
                "amenity=place_of_worship",
                "building=mosque",
                "building=church",
            ],
            &["name", "religion", "denomination"],
        ),
        category(
            "commercial",
            &[
                "shop=supermarket",
                "amenity=bank",
                "amenity=restaurant",
                "amenity=cafe",
            ],
            &["name", "cuisine", "operator"],
        ),
        category(
            "transportation",
            &["amenity=bus_station", "railway=station", "aeroway=airport"],
            &["name", "operator", "public_transport"],
        ),
    ]
}
