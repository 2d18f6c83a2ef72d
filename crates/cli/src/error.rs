//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An `--object` argument was not a JSON document.
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// The documents file could not be read as a JSON array of documents.
    #[error("invalid documents file {path}: {source}")]
    InvalidDocuments {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An error occurred in the policy layer.
    #[error(transparent)]
    Policy(#[from] policy::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
