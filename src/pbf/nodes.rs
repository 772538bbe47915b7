//! Disk-backed node coordinate store.
//!
//! A country extract references tens of millions of nodes; keeping only
//! the referenced ones in a temporary sled tree bounds memory use.

use anyhow::Result;
use sled::Db;
use tempfile::{Builder, TempDir};

use crate::models::Coordinates;

pub struct NodeStore {
    db: Db,
    // Removed when the store is dropped
    _dir: TempDir,
}

impl NodeStore {
    pub fn temporary() -> Result<Self> {
        let dir = Builder::new().prefix("osm-extract-nodes-").tempdir()?;
        let db = sled::open(dir.path())?;
        Ok(Self { db, _dir: dir })
    }

    pub fn insert(&self, id: i64, coords: Coordinates) -> Result<()> {
        self.db.insert(id.to_be_bytes(), &encode(coords))?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<Coordinates>> {
        Ok(self
            .db
            .get(id.to_be_bytes())?
            .and_then(|bytes| decode(&bytes)))
    }

    /// Coordinates of the ids that are stored, in order
    pub fn resolve(&self, ids: &[i64]) -> Result<Vec<Coordinates>> {
        let mut coords = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(c) = self.get(*id)? {
                coords.push(c);
            }
        }
        Ok(coords)
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

/// lon then lat, big-endian
fn encode(coords: Coordinates) -> [u8; 16] {
    let mut value = [0u8; 16];
    value[0..8].copy_from_slice(&coords.lon.to_be_bytes());
    value[8..16].copy_from_slice(&coords.lat.to_be_bytes());
    value
}

fn decode(bytes: &[u8]) -> Option<Coordinates> {
    if bytes.len() != 16 {
        return None;
    }
    let lon = f64::from_be_bytes(bytes[0..8].try_into().ok()?);
    let lat = f64::from_be_bytes(bytes[8..16].try_into().ok()?);
    Some(Coordinates::new(lat, lon))
}
