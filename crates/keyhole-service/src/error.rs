use keyhole_core::StoreError;
use thiserror::Error;

/// Result type for link service operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Failures surfaced to the caller of the link service.
///
/// Every failure is a typed value; nothing here panics. `NotFound` is
/// routine (a 404 at the HTTP layer), `InvalidRequest` is a client
/// error, the rest are server errors the caller may retry with backoff.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("no record for code: {0}")]
    NotFound(String),
    #[error("code space exhausted after {attempts} collision attempts")]
    CodeSpaceExhausted { attempts: u32 },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
