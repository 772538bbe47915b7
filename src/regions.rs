//! Province bounding boxes and the coordinate-to-province heuristic.
//!
//! No polygon geometry is available for the extracted boundaries, so each
//! province is approximated by a rectangle. Adjacent rectangles may overlap;
//! resolution walks the table in declaration order and takes the first hit.

/// Returned when no province rectangle contains the point
pub const OTHER_PROVINCE: &str = "Other Province";

/// Inclusive latitude/longitude rectangle for one province
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub name: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl RegionBounds {
    pub const fn new(
        name: &'static str,
        (lat_min, lat_max): (f64, f64),
        (lon_min, lon_max): (f64, f64),
    ) -> Self {
        Self {
            name,
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Inclusive on all four edges
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat_min <= lat && lat <= self.lat_max && self.lon_min <= lon && lon <= self.lon_max
    }
}

/// Major Turkish provinces, approximate extents around the city centers
pub const PROVINCE_BOUNDS: &[RegionBounds] = &[
    RegionBounds::new("İstanbul", (40.8, 41.3), (28.5, 29.5)),
    RegionBounds::new("Ankara", (39.7, 40.2), (32.5, 33.2)),
    RegionBounds::new("İzmir", (38.2, 38.6), (26.8, 27.4)),
    RegionBounds::new("Bursa", (40.0, 40.4), (28.7, 29.4)),
    RegionBounds::new("Antalya", (36.7, 37.2), (30.4, 31.2)),
    RegionBounds::new("Adana", (36.8, 37.2), (35.0, 35.6)),
    RegionBounds::new("Konya", (37.7, 38.2), (32.2, 33.0)),
    RegionBounds::new("Gaziantep", (36.9, 37.3), (37.2, 37.6)),
    RegionBounds::new("Şanlıurfa", (37.0, 37.4), (38.6, 39.2)),
    RegionBounds::new("Diyarbakır", (37.8, 38.0), (39.9, 40.4)),
    RegionBounds::new("Mersin", (36.6, 37.0), (34.4, 34.8)),
    RegionBounds::new("Kayseri", (38.6, 38.9), (35.3, 35.7)),
    RegionBounds::new("Eskişehir", (39.6, 39.9), (30.4, 31.0)),
    RegionBounds::new("Trabzon", (40.8, 41.2), (39.5, 40.0)),
    RegionBounds::new("Erzurum", (39.8, 40.1), (41.0, 41.5)),
];

/// Province names in table order
pub fn province_names() -> impl Iterator<Item = &'static str> {
    PROVINCE_BOUNDS.iter().map(|b| b.name)
}

/// Maps a coordinate to a province name.
pub trait ProvinceResolver {
    fn resolve(&self, lat: f64, lon: f64) -> &str;
}

/// First-match lookup over an ordered rectangle table
#[derive(Debug, Clone, Copy)]
pub struct BoundingBoxResolver<'a> {
    table: &'a [RegionBounds],
}

impl<'a> BoundingBoxResolver<'a> {
    pub fn new(table: &'a [RegionBounds]) -> Self {
        Self { table }
    }

    pub fn lookup(&self, lat: f64, lon: f64) -> &'a str {
        self.table
            .iter()
            .find(|bounds| bounds.contains(lat, lon))
            .map(|bounds| bounds.name)
            .unwrap_or(OTHER_PROVINCE)
    }
}

impl Default for BoundingBoxResolver<'static> {
    fn default() -> Self {
        Self::new(PROVINCE_BOUNDS)
    }
}

impl ProvinceResolver for BoundingBoxResolver<'_> {
    fn resolve(&self, lat: f64, lon: f64) -> &str {
        self.lookup(lat, lon)
    }
}

/// Resolve against the built-in province table
pub fn resolve_province(lat: f64, lon: f64) -> &'static str {
    BoundingBoxResolver::default().lookup(lat, lon)
}
