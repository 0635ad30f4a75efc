//! Convenience re-exports for common SquadHaus usage
//!
//! This prelude module re-exports the most commonly used items from the SquadHaus workspace,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use squadhaus::prelude::*;
//!
//! // Now you have access to all the common SquadHaus types and traits
//! ```

// Core SquadHaus components
pub use crate::core::SquadHaus;
pub use crate::errors::SquadHausError;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, ServerConfig};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Re-export store_object module
pub use store_object;

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;
