//! Output directory layout and JSON writing.

use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Write `value` as pretty-printed UTF-8 JSON.
///
/// The document is written to a temporary file next to `path` and renamed
/// into place, so a failed run never leaves a truncated artifact behind.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n").map_err(|e| Error::io(path, e))?;
        writer.flush().map_err(|e| Error::io(path, e))?;
    }
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Make a city or region name usable as a file name component
pub fn safe_file_name(name: &str) -> String {
    name.replace(['/', '\\', ':'], "_")
}

/// File naming inside the output directory
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// `<name>_administrative.json`
    pub fn administrative(&self, name: &str) -> PathBuf {
        self.file(&format!("{}_administrative.json", safe_file_name(name)))
    }

    /// `<name>_streets.json`
    pub fn streets(&self, name: &str) -> PathBuf {
        self.file(&format!("{}_streets.json", safe_file_name(name)))
    }

    /// `<name>_poi.json`
    pub fn poi(&self, name: &str) -> PathBuf {
        self.file(&format!("{}_poi.json", safe_file_name(name)))
    }

    /// `<name>_hierarchy.json`
    pub fn hierarchy(&self, name: &str) -> PathBuf {
        self.file(&format!("{}_hierarchy.json", safe_file_name(name)))
    }
}

/// Timestamp format used in every artifact, e.g. `2025-10-21T03:51:38`
pub fn timestamp(at: chrono::DateTime<chrono::Local>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn now() -> String {
    timestamp(chrono::Local::now())
}
