//! Severity catalog error types.

use std::path::PathBuf;

/// The catalog could not be loaded. Fatal to scoring.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read severity catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse severity catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
