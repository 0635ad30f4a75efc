//! Persistent store contract
//!
//! A `RecordStore` executes single-table statements for the generic store.
//! Values travel as JSON mappings; backends bind them as native parameters.

use crate::errors::StoreError;
use crate::query_builder::{Dialect, OrderBy, Predicate};
use crate::traits::descriptor::RecordDescriptor;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;

/// A fully resolved SELECT against one table
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub descriptor: &'static RecordDescriptor,
    /// Projected columns, all declared by the descriptor
    pub fields: Vec<String>,
    pub predicate: Predicate,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectQuery {
    /// Every declared column, no filter
    pub fn new(descriptor: &'static RecordDescriptor) -> Self {
        Self {
            descriptor,
            fields: descriptor.field_names(),
            predicate: Predicate::default(),
            order_by: None,
            limit: None,
            offset: None,
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    fn dialect(&self) -> Dialect;

    /// Rows as mappings keyed by the projected column names
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Map<String, Value>>, StoreError>;

    /// Insert one row and return its generated id
    async fn insert(
        &self,
        descriptor: &RecordDescriptor,
        values: &Map<String, Value>,
    ) -> Result<i64, StoreError>;

    /// Returns the number of affected rows
    async fn update(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
        values: &Map<String, Value>,
    ) -> Result<u64, StoreError>;

    /// Returns the number of removed rows
    async fn delete(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<u64, StoreError>;

    async fn count(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<i64, StoreError>;

    /// Round-trip a trivial statement
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create the descriptor's table if it does not exist yet
    async fn ensure_table(&self, descriptor: &RecordDescriptor) -> Result<(), StoreError>;
}
