//! Errors from the persisted key record.

use thiserror::Error;

/// Reading or writing the key record failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No home directory to place the data directory in
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    /// Injected failure (test stores)
    #[error("Storage error: {0}")]
    Other(String),
}
