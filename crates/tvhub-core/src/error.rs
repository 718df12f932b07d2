//! Error types for tvhub-core

use thiserror::Error;

/// Errors raised by a key-value storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite reported a failure
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The blocking storage task panicked or was cancelled
    #[error("storage task failed: {0}")]
    Task(String),

    /// The store lock was poisoned by a panicking writer
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Core error type for document operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored document is not a valid configuration document
    #[error("stored configuration is not valid JSON: {0}")]
    CorruptDocument(#[source] serde_json::Error),

    /// The document could not be serialized
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A required text field is empty after trimming
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}
