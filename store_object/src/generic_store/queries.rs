//! Read operations

use super::core::GenericStore;
use crate::errors::StoreError;
use crate::query_builder::{FindOptions, PageResult, Pagination, Predicate};
use crate::traits::{Record, SelectQuery};
use serde_json::Value;

impl<T: Record> GenericStore<T> {
    /// Declared fields, or the override after checking each one is declared
    fn resolve_fields(&self, options: &FindOptions) -> Result<Vec<String>, StoreError> {
        let descriptor = T::descriptor();
        match &options.fields {
            None => Ok(descriptor.field_names()),
            Some(fields) => {
                if let Some(unknown) = fields.iter().find(|name| !descriptor.has_field(name)) {
                    return Err(StoreError::validation(format!(
                        "Unknown field '{}' for {}",
                        unknown, descriptor.name
                    )));
                }
                Ok(fields.clone())
            }
        }
    }

    fn select_query(&self, options: &FindOptions) -> Result<SelectQuery, StoreError> {
        Ok(SelectQuery {
            descriptor: T::descriptor(),
            fields: self.resolve_fields(options)?,
            predicate: options.predicate.clone(),
            order_by: options.order_by.clone(),
            limit: options.limit,
            offset: options.offset,
        })
    }

    /// First matching record, or `None`
    pub async fn find_one(&self, options: FindOptions) -> Result<Option<T>, StoreError> {
        let mut query = self.select_query(&options)?;
        query.limit = Some(1);

        let mut rows = self.store.select(&query).await?;
        match rows.pop() {
            Some(row) => T::build(row).map(Some),
            None => Ok(None),
        }
    }

    pub async fn find_many(&self, options: FindOptions) -> Result<Vec<T>, StoreError> {
        let query = self.select_query(&options)?;
        let rows = self.store.select(&query).await?;
        rows.into_iter().map(T::build).collect()
    }

    /// Cache-aside lookup by primary key
    pub async fn find_by_id(&self, id: i64) -> Result<Option<T>, StoreError> {
        let descriptor = T::descriptor();
        let cache = self.read_through_cache();

        if let Some(cache) = cache {
            let key = descriptor.cache_key(id);
            match cache.get(&key).await {
                Some(Value::Object(data)) => match T::build(data) {
                    Ok(record) => return Ok(Some(record)),
                    Err(e) => tracing::warn!(key = %key, error = %e, "ignoring undecodable cache entry"),
                },
                Some(_) => tracing::warn!(key = %key, "ignoring non-object cache entry"),
                None => {}
            }
        }

        let found = self
            .find_one(FindOptions::new().filter(Predicate::by_id(id)))
            .await?;

        if let (Some(record), Some(cache)) = (&found, cache) {
            match record.normalized() {
                Ok(data) => self.spawn_cache_set(cache, id, data),
                Err(e) => tracing::warn!(record = descriptor.name, id, error = %e, "cache population skipped"),
            }
        }

        Ok(found)
    }

    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.find_many(FindOptions::new().filter(Predicate::all())).await
    }

    /// Rows matching the filter; window and ordering are ignored
    pub async fn count_all(&self, options: &FindOptions) -> Result<i64, StoreError> {
        self.store
            .count(T::descriptor(), &options.predicate)
            .await
    }

    /// One page of matching records plus totals
    ///
    /// The page window is validated before any store access, and a page
    /// starting past the last matching row is rejected after counting.
    pub async fn find_per_page(&self, options: FindOptions) -> Result<PageResult<T>, StoreError> {
        let pagination = Pagination::from_options(&options)?;
        self.resolve_fields(&options)?;

        let total_records = self.count_all(&options).await?;
        pagination.check_against(total_records)?;

        let window = FindOptions {
            limit: Some(pagination.limit()),
            offset: Some(pagination.offset()),
            ..options
        };
        let results = self.find_many(window).await?;

        Ok(PageResult::new(results, pagination, total_records))
    }
}
