//! Error handling utilities for the stores

use bantools_core::DomainError;
use std::path::Path;

/// Convert an I/O error on `path` to DomainError
pub fn map_io_error(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::StorageError(format!("{}: {e}", path.display()))
}

/// Convert a serialization error to DomainError
pub fn map_json_error(e: serde_json::Error) -> DomainError {
    DomainError::StorageError(format!("serialization failed: {e}"))
}

/// Document could not be recovered
pub fn corrupted(path: &Path, detail: impl std::fmt::Display) -> DomainError {
    DomainError::PersistenceCorrupted(format!("{}: {detail}", path.display()))
}
