//! # Configuration Management for SquadHaus
//!
//! This crate provides centralized configuration structures for all SquadHaus components,
//! including the relational store, the cache layer and the HTTP server.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{CacheConfig, DatabaseConfig};
//!
//! let db_config = DatabaseConfig::sqlite("squads.db");
//! let cache_config = CacheConfig::redis("redis://localhost:6379".to_string());
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! driver = "postgres"
//! host = "localhost"
//! port = 5432
//! database = "squads"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//!
//! [cache]
//! enabled = true
//! backend = "redis"
//! redis_url = "redis://localhost:6379"
//! key_prefix = "squadhaus:"
//! request_timeout_ms = 300
//! connection_timeout_ms = 200
//! # cluster = true
//! # cluster_nodes = ["redis://node-a:6379", "redis://node-b:6379"]
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! log_level = "info"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from SQUADHAUS_CONFIG or ./squadhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "./squadhaus.toml";
const CONFIG_PATH_VAR: &str = "SQUADHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

/// Relational backend used as the source of truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    Postgres,
    Sqlite,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Database file, only read by the sqlite driver
    pub filename: Option<String>,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub backend: CacheBackend,
    pub redis_url: String,
    /// Talk to a Redis Cluster instead of a single server
    pub cluster: bool,
    /// Cluster seed nodes; `redis_url` is the only seed when empty
    pub cluster_nodes: Vec<String>,
    /// Prepended to every key written by the cache client
    pub key_prefix: String,
    /// Upper bound for a single get/set/del round trip
    pub request_timeout_ms: u64,
    pub connection_timeout_ms: u64,
    /// Minimum delay between two connection attempts after a failure
    pub reconnect_interval_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env / the environment, or the default path
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine, the variable may come from the real environment
        let _ = dotenvy::dotenv();

        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified as {} (environment or .env) or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Database validations
        match self.database.driver {
            DatabaseDriver::Postgres => {
                if self.database.host.is_empty() {
                    return Err(ConfigError::Invalid(
                        "Database host cannot be empty".to_string(),
                    ));
                }
                if self.database.port == 0 {
                    return Err(ConfigError::Invalid(
                        "Database port cannot be zero".to_string(),
                    ));
                }
                if self.database.database.is_empty() {
                    return Err(ConfigError::Invalid(
                        "Database name cannot be empty".to_string(),
                    ));
                }
                if self.database.username.is_empty() {
                    return Err(ConfigError::Invalid(
                        "Database username cannot be empty".to_string(),
                    ));
                }
            }
            DatabaseDriver::Sqlite => {
                if self.database.filename.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::Invalid(
                        "Database filename is required for the sqlite driver".to_string(),
                    ));
                }
            }
        }
        if self.database.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.database.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        // Cache validations
        if self.cache.enabled {
            if self.cache.backend == CacheBackend::Redis && self.cache.seed_nodes().is_empty() {
                return Err(ConfigError::Invalid(
                    "Redis URL cannot be empty".to_string(),
                ));
            }
            if self.cache.request_timeout_ms == 0 {
                return Err(ConfigError::Invalid(
                    "Cache request_timeout_ms must be greater than 0".to_string(),
                ));
            }
            if self.cache.connection_timeout_ms == 0 {
                return Err(ConfigError::Invalid(
                    "Cache connection_timeout_ms must be greater than 0".to_string(),
                ));
            }
        }

        // Server validations
        if self.server.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Server host cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Create a new PostgreSQL configuration
    #[allow(clippy::too_many_arguments)]
    pub fn postgres(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            driver: DatabaseDriver::Postgres,
            host,
            port,
            database,
            username,
            password,
            filename: None,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Create a SQLite configuration backed by `filename`
    pub fn sqlite(filename: &str) -> Self {
        Self {
            driver: DatabaseDriver::Sqlite,
            filename: Some(filename.to_string()),
            ..Self::default()
        }
    }

    /// Build connection string, percent-encoding credentials and database name
    pub fn connection_string(&self) -> Result<String, ConfigError> {
        match self.driver {
            DatabaseDriver::Postgres => {
                let invalid = || {
                    ConfigError::Invalid(format!(
                        "Cannot build a database URL for host '{}'",
                        self.host
                    ))
                };

                let mut url = Url::parse(&format!("postgresql://{}:{}", self.host, self.port))
                    .map_err(|_| invalid())?;
                url.set_username(&self.username).map_err(|_| invalid())?;
                if !self.password.is_empty() {
                    url.set_password(Some(&self.password)).map_err(|_| invalid())?;
                }
                url.set_path(&self.database);
                Ok(url.into())
            }
            DatabaseDriver::Sqlite => Ok(format!(
                "sqlite://{}?mode=rwc",
                self.filename.as_deref().unwrap_or_default()
            )),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::Postgres,
            host: "localhost".to_string(),
            port: 5432,
            database: "squadhaus".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
            filename: None,
            min_connections: 1,
            max_connections: 10,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
            max_lifetime_seconds: 3600,
        }
    }
}

impl CacheConfig {
    /// Create a Redis cache configuration with default timeouts
    pub fn redis(redis_url: String) -> Self {
        Self {
            redis_url,
            ..Self::default()
        }
    }

    /// Create a Redis Cluster configuration from its seed nodes
    pub fn cluster(nodes: Vec<String>) -> Self {
        Self {
            cluster: true,
            cluster_nodes: nodes,
            ..Self::default()
        }
    }

    /// Nodes the client starts from: the cluster seeds, or the single server URL
    pub fn seed_nodes(&self) -> Vec<String> {
        let nodes: Vec<String> = if self.cluster && !self.cluster_nodes.is_empty() {
            self.cluster_nodes.clone()
        } else {
            vec![self.redis_url.clone()]
        };
        nodes.into_iter().filter(|node| !node.is_empty()).collect()
    }

    /// Create an in-process cache configuration
    pub fn memory() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ..Self::default()
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: &str) -> Self {
        self.key_prefix = key_prefix.to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_connection_timeout(mut self, timeout_ms: u64) -> Self {
        self.connection_timeout_ms = timeout_ms;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::Redis,
            redis_url: "redis://localhost:6379".to_string(),
            cluster: false,
            cluster_nodes: Vec::new(),
            key_prefix: String::new(),
            request_timeout_ms: 300,
            connection_timeout_ms: 200,
            reconnect_interval_ms: 1000,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}
