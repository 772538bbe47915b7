//! Loaders for the boundary and street artifacts.

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{AdminLevel, AdministrativeFile, BoundariesByLevel, StreetFile, StreetRecord};

/// Streets exactly as supplied: order preserved, nothing filtered
#[derive(Debug, Clone)]
pub struct StreetCollection {
    pub total_count: usize,
    pub streets: Vec<StreetRecord>,
}

/// Load administrative boundaries and bucket them by level
pub fn load_boundaries(path: &Path) -> Result<BoundariesByLevel> {
    info!("Loading administrative boundaries from {}", path.display());

    let file: AdministrativeFile = read_json(path)?;
    let boundaries = BoundariesByLevel::from_entries(file.boundaries);

    for level in AdminLevel::all() {
        info!(
            "Loaded {} {} boundaries",
            boundaries.get(*level).len(),
            level.field_name()
        );
    }

    Ok(boundaries)
}

/// Load a streets artifact
pub fn load_streets(path: &Path) -> Result<StreetCollection> {
    info!("Loading streets from {}", path.display());

    let file: StreetFile = read_json(path)?;
    let total_count = match file.total_count {
        Some(count) => {
            if count != file.streets.len() {
                warn!(
                    "{} declares total_count {} but contains {} streets",
                    path.display(),
                    count,
                    file.streets.len()
                );
            }
            count
        }
        None => file.streets.len(),
    };

    info!("Loaded {} streets", total_count);

    Ok(StreetCollection {
        total_count,
        streets: file.streets,
    })
}

/// Parse a JSON document, transparently decompressing `.gz` files.
///
/// Syntax errors and missing structure are reported as
/// [`Error::MalformedInput`]; read failures as [`Error::Io`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open(path)?;
    serde_json::from_reader(BufReader::new(reader)).map_err(|e| {
        if e.is_io() {
            Error::io(path, e.into())
        } else {
            Error::malformed(path, e)
        }
    })
}

fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_boundaries_by_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "admin.json",
            r#"{"boundaries": [
                {"id": 1, "admin_level": "2", "name": "Türkiye"},
                {"id": 2, "admin_level": "4", "name": "Ankara"},
                {"id": 3, "admin_level": "6", "name": ""},
                {"id": 4, "admin_level": "8", "name": "Kızılay", "population": 1200},
                {"id": 5, "admin_level": "10", "name": "Quarter"}
            ]}"#,
        );
        let boundaries = load_boundaries(&path).unwrap();
        assert_eq!(boundaries.len(), 4);
        assert_eq!(boundaries.get(AdminLevel::District).len(), 1);
        assert!(boundaries.names(AdminLevel::District).is_empty());
        assert_eq!(boundaries.get(AdminLevel::Neighborhood)[0].id, Some(4));
    }

    #[test]
    fn test_missing_top_level_field_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "admin.json", r#"{"relations": []}"#);
        match load_boundaries(&path) {
            Err(Error::MalformedInput { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected malformed input, got {:?}", other),
        }

        let path = write(&dir, "streets.json", r#"{"total_count": 0}"#);
        assert!(matches!(
            load_streets(&path),
            Err(Error::MalformedInput { .. })
        ));

        let path = write(&dir, "broken.json", r#"{"streets": ["#);
        assert!(matches!(
            load_streets(&path),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_streets(&path), Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_streets_preserves_order_and_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "streets.json",
            r#"{"total_count": 3, "streets": [
                {"id": 3, "name": "C", "highway_type": "residential", "center_lat": 39.9, "center_lon": 32.8},
                {"id": 1, "name": "A", "highway_type": "primary"},
                {"id": 1, "name": "A", "highway_type": "primary", "center_lat": 95.0, "center_lon": 200.0}
            ]}"#,
        );
        let collection = load_streets(&path).unwrap();
        assert_eq!(collection.total_count, 3);
        let ids: Vec<i64> = collection.streets.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 1]);
        assert!(collection.streets[1].center().is_none());
        assert_eq!(collection.streets[2].center_lat, Some(95.0));
    }

    #[test]
    fn test_total_count_defaults_to_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "streets.json", r#"{"streets": [{"id": 1}]}"#);
        assert_eq!(load_streets(&path).unwrap().total_count, 1);
    }

    #[test]
    fn test_gzip_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.json.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder
            .write_all(br#"{"boundaries": [{"admin_level": "4", "name": "Bursa"}]}"#)
            .unwrap();
        encoder.finish().unwrap();

        let boundaries = load_boundaries(&path).unwrap();
        assert!(boundaries.names(AdminLevel::Province).contains("Bursa"));
    }
}
