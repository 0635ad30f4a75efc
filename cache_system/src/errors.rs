//! Error types for cache operations
//!
//! These errors stay inside the cache clients: the `CacheClient` contract
//! turns every one of them into a miss or a no-op.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache operation timeout")]
    Timeout,

    #[error("Cache connection is not ready")]
    NotReady,
}

impl CacheError {
    /// Whether the shared connection must be recreated after this error
    pub fn poisons_connection(&self) -> bool {
        matches!(self, CacheError::ConnectionError(_))
    }
}
