//! # Document Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    // Connectivity
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid store URI: {0}")]
    InvalidUri(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    // Collection errors
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    #[error("Invalid collection name: {0}")]
    InvalidName(String),

    // Persistence
    #[error("Corrupt collection file {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl StoreError {
    /// Whether the error means the store cannot be reached or opened at all
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_)
                | StoreError::InvalidUri(_)
                | StoreError::Timeout(_)
                | StoreError::Corrupt { .. }
        )
    }
}
