//! # SquadHaus
//!
//! A small REST service for squads, built on a generic record mapper with
//! cache-aside reads, dynamic predicates and count-validated pagination.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use squadhaus::prelude::*;
//! use squadhaus::models::Squad;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = AppConfig::default();
//!     config.database = DatabaseConfig::sqlite("squads.db");
//!     config.cache = CacheConfig::memory();
//!
//!     let haus = SquadHaus::new(&config).await?;
//!     haus.ensure_table::<Squad>().await?;
//!
//!     let squads = haus.generic_store::<Squad>();
//!     let mut alpha = Squad::new("Alpha", "P1", "T1", 5);
//!     let id = squads.save(&mut alpha).await?;
//!     println!("Created squad {:?}", id);
//!
//!     let page = squads
//!         .find_per_page(FindOptions::new().per_page(10).order_by(OrderBy::desc("createdAt")))
//!         .await?;
//!     println!("{} squads in total", page.total_records);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macro
/// Only compiled in when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod models;
pub mod prelude;
pub mod schema;
pub mod server;

// Re-export the main public types for convenience
pub use core::SquadHaus;
pub use errors::SquadHausError;
