//! Redis cache client
//!
//! Holds one lazily created connection shared by every clone: a multiplexed
//! connection to a single server, or a cluster connection that sends reads
//! to replicas. Operations never wait for a connection: while it is being
//! established, or after a failed attempt, they short-circuit to a miss.

use crate::client::CacheClient;
use crate::errors::CacheError;
use async_trait::async_trait;
use config::CacheConfig;
use redis::aio::MultiplexedConnection;
use redis::cluster::ClusterClient;
use redis::cluster_async::ClusterConnection;
use redis::{Client, Cmd, FromRedisValue, RedisResult};
use serde_json::Value;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

enum RedisClient {
    Single(Client),
    Cluster(ClusterClient),
}

#[derive(Clone)]
enum RedisConnection {
    Single(MultiplexedConnection),
    Cluster(ClusterConnection),
}

impl RedisConnection {
    async fn query<T: FromRedisValue>(&mut self, command: &Cmd) -> RedisResult<T> {
        match self {
            RedisConnection::Single(connection) => command.query_async(connection).await,
            RedisConnection::Cluster(connection) => command.query_async(connection).await,
        }
    }
}

enum ConnectionState {
    Idle,
    Connecting,
    Ready(RedisConnection),
    Failed(Instant),
}

/// Redis-based cache client
#[derive(Clone)]
pub struct RedisCache {
    client: Arc<RedisClient>,
    config: Arc<CacheConfig>,
    state: Arc<RwLock<ConnectionState>>,
}

impl Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.state.try_read() {
            Ok(state) => match &*state {
                ConnectionState::Idle => "idle",
                ConnectionState::Connecting => "connecting",
                ConnectionState::Ready(_) => "ready",
                ConnectionState::Failed(_) => "failed",
            },
            Err(_) => "lock_error",
        };

        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("cluster", &self.is_cluster())
            .field("connection", &connection_status)
            .finish()
    }
}

impl RedisCache {
    /// Create a new cache client; no connection is opened until first use or `connect`
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let client = if config.cluster {
            // One attempt per command, like the single-server client
            let client = ClusterClient::builder(config.seed_nodes())
                .read_from_replicas()
                .retries(0)
                .build()?;
            RedisClient::Cluster(client)
        } else {
            RedisClient::Single(Client::open(config.redis_url.as_str())?)
        };

        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
            state: Arc::new(RwLock::new(ConnectionState::Idle)),
        })
    }

    /// Establish the shared connection now instead of on first use
    pub async fn connect(&self) -> Result<(), CacheError> {
        let outcome = self.open_connection().await;
        let mut state = self.state.write().await;
        match outcome {
            Ok(connection) => {
                *state = ConnectionState::Ready(connection);
                Ok(())
            }
            Err(error) => {
                *state = ConnectionState::Failed(Instant::now());
                Err(error)
            }
        }
    }

    /// Whether operations currently reach Redis
    pub async fn is_ready(&self) -> bool {
        matches!(&*self.state.read().await, ConnectionState::Ready(_))
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_cluster(&self) -> bool {
        matches!(*self.client, RedisClient::Cluster(_))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.config.request_timeout_ms)
    }

    fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.config.connection_timeout_ms)
    }

    fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.config.reconnect_interval_ms)
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }

    async fn establish(&self) -> Result<RedisConnection, CacheError> {
        match &*self.client {
            RedisClient::Single(client) => Ok(RedisConnection::Single(
                client.get_multiplexed_async_connection().await?,
            )),
            RedisClient::Cluster(client) => Ok(RedisConnection::Cluster(
                client.get_async_connection().await?,
            )),
        }
    }

    async fn open_connection(&self) -> Result<RedisConnection, CacheError> {
        match tokio::time::timeout(self.connection_timeout(), self.establish()).await {
            Ok(connection) => connection,
            Err(_) => Err(CacheError::Timeout),
        }
    }

    /// Hand out the shared connection if it is ready, otherwise kick off a
    /// background connect and report `NotReady`
    async fn ready_connection(&self) -> Result<RedisConnection, CacheError> {
        {
            let state = self.state.read().await;
            match &*state {
                ConnectionState::Ready(connection) => return Ok(connection.clone()),
                ConnectionState::Connecting => return Err(CacheError::NotReady),
                ConnectionState::Failed(at) if at.elapsed() < self.reconnect_interval() => {
                    return Err(CacheError::NotReady);
                }
                _ => {}
            }
        }

        self.spawn_connect().await;
        Err(CacheError::NotReady)
    }

    async fn spawn_connect(&self) {
        {
            let mut state = self.state.write().await;
            let busy = match &*state {
                ConnectionState::Ready(_) | ConnectionState::Connecting => true,
                ConnectionState::Failed(at) => at.elapsed() < self.reconnect_interval(),
                ConnectionState::Idle => false,
            };
            if busy {
                return;
            }
            *state = ConnectionState::Connecting;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            let outcome = cache.open_connection().await;
            let mut state = cache.state.write().await;
            *state = match outcome {
                Ok(connection) => {
                    tracing::debug!(cluster = cache.is_cluster(), "cache connection ready");
                    ConnectionState::Ready(connection)
                }
                Err(error) => {
                    tracing::warn!(nodes = ?cache.config.seed_nodes(), error = %error, "cache connection failed");
                    ConnectionState::Failed(Instant::now())
                }
            };
        });
    }

    /// Drop the shared connection so that a fresh one is opened on a later call
    async fn reset_connection(&self) {
        let mut state = self.state.write().await;
        *state = ConnectionState::Idle;
    }

    /// Run one command under the request timeout, absorbing every failure
    async fn execute<T, F>(&self, operation: &'static str, key: &str, command: F) -> Option<T>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        let outcome = match tokio::time::timeout(self.request_timeout(), command).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout),
        };

        match outcome {
            Ok(value) => {
                debug_log!(operation, key, "cache command completed");
                Some(value)
            }
            Err(CacheError::NotReady) => {
                debug_log!(operation, key, "cache connection not ready");
                None
            }
            Err(CacheError::Timeout) => {
                tracing::debug!(operation, key, "cache operation timed out");
                None
            }
            Err(error) => {
                if error.poisons_connection() {
                    self.reset_connection().await;
                }
                tracing::warn!(operation, key, error = %error, "cache operation failed");
                None
            }
        }
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let cache_key = self.build_key(key);
        self.execute("get", &cache_key, async {
            let mut connection = self.ready_connection().await?;
            let mut command = redis::cmd("GET");
            command.arg(&cache_key);
            let cached: Option<String> = connection.query(&command).await?;
            match cached {
                Some(json_str) => Ok(Some(serde_json::from_str::<Value>(&json_str)?)),
                None => Ok(None),
            }
        })
        .await
        .flatten()
    }

    async fn set(&self, key: &str, value: &Value, ttl_seconds: u64) -> bool {
        let cache_key = self.build_key(key);
        self.execute("set", &cache_key, async {
            let json_str = serde_json::to_string(value)?;
            let mut connection = self.ready_connection().await?;
            let mut command = redis::cmd("SET");
            command.arg(&cache_key).arg(json_str);
            if ttl_seconds > 0 {
                command.arg("EX").arg(ttl_seconds);
            }
            let _: () = connection.query(&command).await?;
            Ok(())
        })
        .await
        .is_some()
    }

    async fn del(&self, key: &str) -> bool {
        let cache_key = self.build_key(key);
        self.execute("del", &cache_key, async {
            let mut connection = self.ready_connection().await?;
            let mut command = redis::cmd("DEL");
            command.arg(&cache_key);
            let _: i64 = connection.query(&command).await?;
            Ok(())
        })
        .await
        .is_some()
    }
}
