//! Error types returned by the citation store.
//!
//! A corrupt `citations.json` is not an error: the store recovers with an
//! empty document and logs a warning. References to unregistered sources
//! are not errors either; they render as `Unknown` placeholders.

use std::path::PathBuf;

/// Failures surfaced by store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file under the project failed.
    #[error("failed to access {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory document could not be encoded as JSON.
    #[error("failed to encode citations document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A required argument was blank or empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Persistence {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
