use crate::traits::{Record, RecordDescriptor, RecordStore};
use cache_system::CacheClient;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Generic record mapper: persistence, cache-aside reads and pagination for one record type
pub struct GenericStore<T: Record> {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) cache: Option<Arc<dyn CacheClient>>,
    pub(crate) _phantom: std::marker::PhantomData<T>,
}

impl<T: Record> Clone for GenericStore<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: self.cache.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: Record> std::fmt::Debug for GenericStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let descriptor = T::descriptor();
        f.debug_struct("GenericStore")
            .field("record", &descriptor.name)
            .field("table", &descriptor.table)
            .field("has_cache", &self.has_cache())
            .field("use_cache", &descriptor.use_cache)
            .field("cache_time", &descriptor.cache_time)
            .finish()
    }
}

impl<T: Record> GenericStore<T> {
    pub fn new(store: Arc<dyn RecordStore>, cache: Option<Arc<dyn CacheClient>>) -> Self {
        Self {
            store,
            cache,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn descriptor(&self) -> &'static RecordDescriptor {
        T::descriptor()
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Check if a cache client is set
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// The cache client, when one is set and the record type opts into caching
    pub(crate) fn read_through_cache(&self) -> Option<&Arc<dyn CacheClient>> {
        if T::descriptor().use_cache {
            self.cache.as_ref()
        } else {
            None
        }
    }

    /// Populate the cache in a detached task; the caller never waits for it
    pub(crate) fn spawn_cache_set(&self, cache: &Arc<dyn CacheClient>, id: i64, data: Map<String, Value>) {
        let descriptor = T::descriptor();
        let cache = Arc::clone(cache);
        let key = descriptor.cache_key(id);
        let ttl = descriptor.cache_time;

        tokio::spawn(async move {
            if !cache.set(&key, &Value::Object(data), ttl).await {
                tracing::debug!(key = %key, "cache population skipped");
            }
        });
    }
}
