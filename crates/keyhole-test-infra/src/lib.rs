//! Disposable backing services for integration tests.

pub mod redis;

pub use redis::RedisServer;
