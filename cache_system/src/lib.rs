//! Cache system for best-effort record caching
//!
//! This crate provides the `CacheClient` contract and its Redis and
//! in-process implementations. Cache failures never reach the caller.

/// Conditional debug logging macro
/// Only compiled in when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod client;
pub mod errors;
pub mod memory;
pub mod prelude;
pub mod redis_cache;

// Re-export centralized config
pub use config::{CacheBackend, CacheConfig};

pub use client::CacheClient;
pub use errors::CacheError;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
