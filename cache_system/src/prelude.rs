//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::client::CacheClient;
pub use crate::errors::CacheError;
pub use crate::memory::MemoryCache;
pub use crate::redis_cache::RedisCache;

// Re-export centralized config
pub use config::{CacheBackend, CacheConfig};

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use serde_json;
