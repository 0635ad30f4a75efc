//! Store Object - generic record mapper for SquadHaus
//!
//! This crate provides the record contract, the `GenericStore` core
//! (persistence, cache-aside reads, pagination), predicate and SQL
//! generation, and the PostgreSQL/SQLite store backends.

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

pub mod errors;
pub mod executor;
pub mod generic_store;
pub mod prelude;
pub mod query_builder;
pub mod traits;
pub mod validation;

pub use errors::StoreError;
pub use executor::{PostgresStore, SqliteStore};
pub use generic_store::GenericStore;
pub use query_builder::{
    Dialect, FindOptions, OrderBy, PageResult, Predicate, SortOrder, WhereParams, MAX_PER_PAGE,
};
pub use traits::*;
pub use validation::{IdentifierError, ValidatedFieldName, ValidatedTableName};
