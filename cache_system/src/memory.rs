//! In-process cache client
//!
//! Entries are stored JSON-encoded, exactly as they would be in Redis, and
//! expire lazily on read. Writes sweep out expired entries whenever the map
//! outgrows the sweep mark, so keys that are never read again do not pile up.
//! The availability switch lets callers simulate an unreachable backend.

use crate::client::CacheClient;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Entry {
    payload: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    unavailable: Arc<AtomicBool>,
    sweep_threshold: usize,
    /// Map size at which the next write sweeps expired entries
    sweep_at: Arc<AtomicUsize>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_sweep_threshold(DEFAULT_SWEEP_THRESHOLD)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that sweeps expired entries once it holds `threshold` keys
    pub fn with_sweep_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            entries: Arc::default(),
            unavailable: Arc::default(),
            sweep_threshold: threshold,
            sweep_at: Arc::new(AtomicUsize::new(threshold)),
        }
    }

    /// Toggle the simulated backend availability
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Store a raw payload as-is, bypassing JSON encoding
    pub async fn set_raw(&self, key: &str, payload: &str) {
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                payload: payload.to_string(),
                expires_at: None,
            },
        );
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        if !self.is_available() {
            return None;
        }

        let payload = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => Some(entry.payload.clone()),
                Some(_) => None,
                None => return None,
            }
        };

        match payload {
            Some(payload) => serde_json::from_str(&payload).ok(),
            None => {
                self.entries.write().await.remove(key);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl_seconds: u64) -> bool {
        if !self.is_available() {
            return false;
        }

        let Ok(payload) = serde_json::to_string(value) else {
            return false;
        };
        let expires_at = (ttl_seconds > 0).then(|| Instant::now() + Duration::from_secs(ttl_seconds));

        let mut entries = self.entries.write().await;
        if entries.len() >= self.sweep_at.load(Ordering::Relaxed) {
            entries.retain(|_, entry| !entry.is_expired());
            debug_log!(live = entries.len(), "memory cache swept");
            // Live entries raise the mark so a full map is not rescanned on every write
            let next = (entries.len() * 2).max(self.sweep_threshold);
            self.sweep_at.store(next, Ordering::Relaxed);
        }
        entries.insert(key.to_string(), Entry { payload, expires_at });
        true
    }

    async fn del(&self, key: &str) -> bool {
        if !self.is_available() {
            return false;
        }

        self.entries.write().await.remove(key);
        true
    }
}
