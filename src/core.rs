//! Core SquadHaus functionality
//!
//! This module contains the SquadHaus coordinator: it opens the store pool and
//! the cache client once, then hands both to every `GenericStore<T>`.

use std::sync::Arc;
use std::time::Duration;

use cache_system::{CacheBackend, CacheClient, MemoryCache, RedisCache};
use config::{AppConfig, CacheConfig, DatabaseConfig, DatabaseDriver};
use store_object::{GenericStore, PostgresStore, Record, RecordStore, SqliteStore};

use crate::errors::SquadHausError;

/// Owns the shared store and cache handles
#[derive(Clone)]
pub struct SquadHaus {
    store: Arc<dyn RecordStore>,
    cache: Option<Arc<dyn CacheClient>>,
}

impl std::fmt::Debug for SquadHaus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SquadHaus")
            .field("store", &self.store)
            .field("cache", &self.cache)
            .finish()
    }
}

impl SquadHaus {
    /// Connect the store and build the cache client described by `config`
    pub async fn new(config: &AppConfig) -> Result<Self, SquadHausError> {
        let store = Self::connect_store(&config.database).await?;
        let cache = Self::build_cache(&config.cache).await?;
        Ok(Self { store, cache })
    }

    /// Wire already built handles, e.g. an in-memory store in tests
    pub fn from_parts(store: Arc<dyn RecordStore>, cache: Option<Arc<dyn CacheClient>>) -> Self {
        Self { store, cache }
    }

    async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn RecordStore>, SquadHausError> {
        let connection_string = config.connection_string()?;
        let acquire_timeout = Duration::from_secs(config.connection_timeout_seconds);
        let idle_timeout = Duration::from_secs(config.idle_timeout_seconds);
        // Zero means connections live as long as the pool
        let max_lifetime =
            (config.max_lifetime_seconds > 0).then(|| Duration::from_secs(config.max_lifetime_seconds));

        let store: Arc<dyn RecordStore> = match config.driver {
            DatabaseDriver::Postgres => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .min_connections(config.min_connections)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(max_lifetime)
                    .connect(&connection_string)
                    .await?;
                Arc::new(PostgresStore::new(pool))
            }
            DatabaseDriver::Sqlite => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .min_connections(config.min_connections)
                    .acquire_timeout(acquire_timeout)
                    .idle_timeout(idle_timeout)
                    .max_lifetime(max_lifetime)
                    .connect(&connection_string)
                    .await?;
                Arc::new(SqliteStore::new(pool))
            }
        };

        tracing::info!(driver = ?config.driver, "store connected");
        Ok(store)
    }

    /// A disabled cache yields `None`; an unreachable Redis is only logged
    async fn build_cache(
        config: &CacheConfig,
    ) -> Result<Option<Arc<dyn CacheClient>>, SquadHausError> {
        if !config.enabled {
            tracing::info!("cache disabled");
            return Ok(None);
        }

        let cache: Arc<dyn CacheClient> = match config.backend {
            CacheBackend::Redis => {
                let redis = RedisCache::new(config.clone())?;
                if let Err(error) = redis.connect().await {
                    tracing::warn!(nodes = ?config.seed_nodes(), cluster = config.cluster, error = %error, "cache unreachable, continuing without it until it recovers");
                }
                Arc::new(redis)
            }
            CacheBackend::Memory => Arc::new(MemoryCache::new()),
        };

        tracing::info!(backend = ?config.backend, "cache ready");
        Ok(Some(cache))
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn cache(&self) -> Option<&Arc<dyn CacheClient>> {
        self.cache.as_ref()
    }

    /// A record mapper for `T` sharing this coordinator's handles
    pub fn generic_store<T: Record>(&self) -> GenericStore<T> {
        GenericStore::new(Arc::clone(&self.store), self.cache.clone())
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), SquadHausError> {
        self.store.ping().await?;
        Ok(())
    }
}
