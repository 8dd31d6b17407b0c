//! Store error types

use ekmyth_domain::MythId;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with the given id
    #[error("Myth not found: {0}")]
    NotFound(MythId),

    /// A record with the given id already exists
    #[error("Duplicate myth id: {0}")]
    DuplicateId(MythId),

    /// Input rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend refused the write
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Snapshot could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
