//! Core types and traits for the Keyhole short-link service.
//!
//! This crate provides the leaf components shared by the storage
//! adapters and the link service: the base-62 encoder, the URL hasher,
//! the validated short code type, the persisted record shape, and the
//! mapping-store seam.

pub mod base62;
pub mod context;
pub mod error;
pub mod hash;
pub mod record;
pub mod shortcode;
pub mod store;

pub use context::RequestContext;
pub use error::{CoreError, StoreError};
pub use hash::{UrlHasher, Xxh32UrlHasher};
pub use record::LinkRecord;
pub use shortcode::ShortCode;
pub use store::MappingStore;
