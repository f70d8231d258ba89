//! # Catalog Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog errors
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// A record with the same Title/Author/Year/Pages/ISBN (or ID) exists
    #[error("Book already exists")]
    DuplicateRecord,

    /// No record has the requested ID
    #[error("Book not found: {0}")]
    NotFound(String),

    /// Missing required fields, malformed ID, empty search query, bad body
    #[error("{0}")]
    BadRequest(String),

    /// The store cannot be reached
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Any other store or worker failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::DuplicateRecord => 409,
            CatalogError::NotFound(_) => 404,
            CatalogError::BadRequest(_) => 400,
            CatalogError::StoreUnavailable(_) => 500,
            CatalogError::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            CatalogError::StoreUnavailable(err.to_string())
        } else {
            CatalogError::Internal(err.to_string())
        }
    }
}
