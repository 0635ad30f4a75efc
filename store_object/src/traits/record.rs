//! The record contract implemented by every persisted type

use crate::errors::StoreError;
use crate::traits::descriptor::RecordDescriptor;
use chrono::{DateTime, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// System attributes shared by every record
///
/// Embedded with `#[serde(flatten)]`, so it contributes the `id`, `createdAt`
/// and `updatedAt` keys. Only the store core assigns them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordMeta {
    id: Option<i64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
    /// Meta pointing at an already persisted row
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}

/// Current time at the precision both backends round-trip
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A typed row of one table
///
/// Implementors supply the descriptor and access to their [`RecordMeta`];
/// the mapping to and from JSON objects comes from serde.
pub trait Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    fn descriptor() -> &'static RecordDescriptor;

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    fn id(&self) -> Option<i64> {
        self.meta().id()
    }

    /// Declared fields in declared order; fields the value lacks become null
    fn normalized(&self) -> Result<Map<String, Value>, StoreError> {
        let descriptor = Self::descriptor();
        let Value::Object(mut object) = serde_json::to_value(self)? else {
            return Err(StoreError::InvalidRecord(format!(
                "{} does not serialize to an object",
                descriptor.name
            )));
        };

        let mut normalized = Map::with_capacity(descriptor.fields.len());
        for field in descriptor.fields {
            let value = object.remove(field.name).unwrap_or(Value::Null);
            normalized.insert(field.name.to_string(), value);
        }
        Ok(normalized)
    }

    /// Build a record from a row or cached mapping
    fn build(data: Map<String, Value>) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(data))
            .map_err(|e| StoreError::InvalidRecord(format!("{}: {}", Self::descriptor().name, e)))
    }
}
