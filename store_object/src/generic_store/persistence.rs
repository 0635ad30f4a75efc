//! Record lifecycle: insert, update, delete

use super::core::GenericStore;
use crate::errors::StoreError;
use crate::query_builder::Predicate;
use crate::traits::record::now;
use crate::traits::Record;

impl<T: Record> GenericStore<T> {
    /// Insert a record without an id, update one that has it
    ///
    /// Returns the generated id for an insert and `None` for an update.
    pub async fn save(&self, record: &mut T) -> Result<Option<i64>, StoreError> {
        match record.id() {
            None => self.insert(record).await.map(Some),
            Some(_) => {
                self.update(record).await?;
                Ok(None)
            }
        }
    }

    /// Stamp both timestamps, insert, and assign the generated id onto the record
    pub async fn insert(&self, record: &mut T) -> Result<i64, StoreError> {
        let descriptor = T::descriptor();
        record.meta_mut().stamp_created(now());

        let mut values = record.normalized()?;
        values.retain(|_, value| !value.is_null());

        let id = self.store.insert(descriptor, &values).await?;
        record.meta_mut().assign_id(id);
        tracing::debug!(record = descriptor.name, id, "record inserted");

        if let Some(cache) = self.read_through_cache() {
            match record.normalized() {
                Ok(data) => self.spawn_cache_set(cache, id, data),
                Err(e) => tracing::warn!(record = descriptor.name, id, error = %e, "cache population skipped"),
            }
        }

        Ok(id)
    }

    /// Bump `updatedAt` and write the non-null mutable fields; the cached copy is dropped, not refreshed
    pub async fn update(&self, record: &mut T) -> Result<u64, StoreError> {
        let descriptor = T::descriptor();
        let id = record
            .id()
            .ok_or_else(|| StoreError::Unpersisted(descriptor.table.to_string()))?;
        record.meta_mut().touch(now());

        let mut values = record.normalized()?;
        values.retain(|name, value| name != "id" && name != "createdAt" && !value.is_null());

        let affected = self
            .store
            .update(descriptor, &Predicate::by_id(id), &values)
            .await?;
        tracing::debug!(record = descriptor.name, id, affected, "record updated");

        if let Some(cache) = self.read_through_cache() {
            cache.del(&descriptor.cache_key(id)).await;
        }

        Ok(affected)
    }

    /// Remove the row and its cached copy, then forget the id
    ///
    /// The cache entry is dropped whenever a cache client is set, even for
    /// types that do not read through it.
    pub async fn delete(&self, record: &mut T) -> Result<u64, StoreError> {
        let descriptor = T::descriptor();
        let id = record
            .id()
            .ok_or_else(|| StoreError::Unpersisted(descriptor.table.to_string()))?;

        let removed = self.store.delete(descriptor, &Predicate::by_id(id)).await?;
        tracing::debug!(record = descriptor.name, id, removed, "record deleted");

        if let Some(cache) = &self.cache {
            cache.del(&descriptor.cache_key(id)).await;
        }

        record.meta_mut().clear_id();
        Ok(removed)
    }
}
