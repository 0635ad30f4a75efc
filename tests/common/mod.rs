#![allow(dead_code)]

use async_trait::async_trait;
use cache_system::CacheClient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use squadhaus::models::Squad;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use store_object::query_builder::Dialect;
use store_object::{
    FieldDef, Predicate, Record, RecordDescriptor, RecordMeta, RecordStore, SelectQuery,
    SqliteStore, StoreError,
};

static NOTE: RecordDescriptor = RecordDescriptor::new(
    "Note",
    "note",
    &[
        FieldDef::id("id"),
        FieldDef::text("body"),
        FieldDef::timestamp("createdAt"),
        FieldDef::timestamp("updatedAt"),
    ],
)
.without_cache();

/// A record type that never reads through the cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub body: Option<String>,
}

impl Note {
    pub fn new(body: &str) -> Self {
        Self {
            meta: RecordMeta::default(),
            body: Some(body.to_string()),
        }
    }
}

impl Record for Note {
    fn descriptor() -> &'static RecordDescriptor {
        &NOTE
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

/// Fresh in-memory database with the squad and note tables
pub async fn sqlite_store() -> SqliteStore {
    let store = SqliteStore::connect_in_memory()
        .await
        .expect("failed to open in-memory sqlite");
    store
        .ensure_table(Squad::descriptor())
        .await
        .expect("failed to create squad table");
    store
        .ensure_table(Note::descriptor())
        .await
        .expect("failed to create note table");
    store
}

/// Poll until the detached cache write for `key` has landed
pub async fn wait_for_cache(cache: &dyn CacheClient, key: &str) -> Value {
    for _ in 0..100 {
        if let Some(value) = cache.get(key).await {
            return value;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("cache key {} was never populated", key);
}

/// Delegating store that counts every call reaching the backend
#[derive(Debug)]
pub struct CountingStore {
    inner: SqliteStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: SqliteStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Map<String, Value>>, StoreError> {
        self.hit();
        self.inner.select(query).await
    }

    async fn insert(
        &self,
        descriptor: &RecordDescriptor,
        values: &Map<String, Value>,
    ) -> Result<i64, StoreError> {
        self.hit();
        self.inner.insert(descriptor, values).await
    }

    async fn update(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
        values: &Map<String, Value>,
    ) -> Result<u64, StoreError> {
        self.hit();
        self.inner.update(descriptor, predicate, values).await
    }

    async fn delete(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<u64, StoreError> {
        self.hit();
        self.inner.delete(descriptor, predicate).await
    }

    async fn count(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<i64, StoreError> {
        self.hit();
        self.inner.count(descriptor, predicate).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.hit();
        self.inner.ping().await
    }

    async fn ensure_table(&self, descriptor: &RecordDescriptor) -> Result<(), StoreError> {
        self.hit();
        self.inner.ensure_table(descriptor).await
    }
}
