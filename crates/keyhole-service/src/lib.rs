//! Link service implementation for Keyhole.
//!
//! This crate orchestrates the hasher, encoder, code resolver, and
//! mapping store into the two operations the HTTP layer consumes:
//! creating a short link and resolving a code back to its target URL.

pub mod error;
pub mod resolver;
pub mod service;
pub mod settings;

pub use error::LinkError;
pub use resolver::{CodeResolver, Resolution};
pub use service::LinkService;
pub use settings::ServiceSettings;
