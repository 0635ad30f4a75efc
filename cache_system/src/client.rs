//! Cache client contract
//!
//! Every backend implements this trait. None of the methods can fail: the
//! cache is best-effort and callers fall back to the store on a miss.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

#[async_trait]
pub trait CacheClient: Send + Sync + Debug {
    /// Read and decode a JSON value; backend errors, timeouts and undecodable payloads are a miss
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store a JSON value with an expiration, returning whether the write was acknowledged
    async fn set(&self, key: &str, value: &Value, ttl_seconds: u64) -> bool;

    /// Remove a key, returning whether the backend acknowledged the command
    async fn del(&self, key: &str) -> bool;
}
