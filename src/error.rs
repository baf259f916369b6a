//! Error types for posture-audit.
//!
//! Each layer owns its own error enum. `AuditError` collects the ones that
//! fail a command-line run; settings and config problems only degrade it and
//! are logged where they happen.

use crate::catalog::CatalogError;
use crate::scan::ScanError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for a posture-audit run.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Scan aborted: {0}")]
    Scan(#[from] ScanError),

    #[error("Severity catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to write output to {path}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressError;

    #[test]
    fn test_error_display_scan() {
        let err: AuditError = ScanError::Progress(ProgressError::new("dialog closed")).into();
        assert_eq!(
            err.to_string(),
            "Scan aborted: Progress reporting failed: dialog closed"
        );
    }

    #[test]
    fn test_error_display_write_output() {
        let err = AuditError::WriteOutput {
            path: PathBuf::from("/tmp/report.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write output to /tmp/report.json");
    }

    #[test]
    fn test_error_from_catalog_error() {
        let err: AuditError = CatalogError::Read {
            path: PathBuf::from("catalog.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
        .into();
        assert!(err.to_string().starts_with("Severity catalog error"));
    }
}
