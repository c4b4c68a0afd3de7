use thiserror::Error;

/// Result type for mapping-store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by a [`MappingStore`](crate::store::MappingStore) backend.
///
/// A transport failure is never reported as an absent key; the resolver's
/// collision logic depends on that distinction.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("record serialization failed: {0}")]
    Serialization(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}
