//! Library error type.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input artifact is missing required structure. Fatal to a run.
    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Overpass request failed")]
    Http(#[from] reqwest::Error),

    #[error("Overpass returned status {status}: {body}")]
    OverpassStatus { status: u16, body: String },

    #[error("Overpass query failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::MalformedInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
