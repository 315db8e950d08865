use serde::Serialize;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("entry not found: {0}")]
    EntryNotFound(i64),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("counter invariant violated: {0}")]
    Corruption(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// A single field-level validation failure, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Malformed or out-of-range input; carries field-level details and is
    /// raised before any store access.
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    /// The entry does not exist, or it exists but is not owned by the
    /// caller. The two cases are deliberately indistinguishable.
    #[error("entry not found or access denied")]
    NotFound,
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::EntryNotFound(_) => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
