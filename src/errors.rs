//! Error types for the SquadHaus crate
//!
//! Startup and wiring failures. Errors raised while serving requests come
//! from the record mapper as `StoreError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SquadHausError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(#[from] store_object::StoreError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache_system::CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
