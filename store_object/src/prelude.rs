//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{
    FieldDef, FieldKind, Record, RecordDescriptor, RecordMeta, RecordStore, SelectQuery,
};

// Error types
pub use crate::errors::StoreError;

// Core store functionality
pub use crate::generic_store::GenericStore;

// Store backends
pub use crate::executor::{PostgresStore, SqliteStore};

// Query building
pub use crate::query_builder::{FindOptions, OrderBy, PageResult, Predicate, SortOrder};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
