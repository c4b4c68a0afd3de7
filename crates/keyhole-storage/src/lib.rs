//! [`MappingStore`](keyhole_core::MappingStore) implementations.
//!
//! `RedisMappingStore` is the production backend; `InMemoryMappingStore`
//! is a drop-in double for tests and single-process deployments.

pub mod memory;
pub mod redis;

pub use memory::InMemoryMappingStore;
pub use redis::RedisMappingStore;
