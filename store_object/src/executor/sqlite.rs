//! SQLite backend

use crate::debug_log;
use crate::errors::StoreError;
use crate::executor::decode_record;
use crate::query_builder::{Dialect, Predicate, SqlGenerator};
use crate::traits::{RecordDescriptor, RecordStore, SelectQuery};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A private in-memory database on a single long-lived connection
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn generator(&self) -> SqlGenerator {
        SqlGenerator::new(Dialect::Sqlite)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Map<String, Value>>, StoreError> {
        let statement = self.generator().select(query)?;
        debug_log!(sql = %statement.sql, params = statement.params.len(), "select");

        let rows = bind_all!(
            sqlx::query_scalar::<sqlx::Sqlite, String>(&statement.sql),
            statement.params
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|raw| decode_record(raw)).collect()
    }

    async fn insert(
        &self,
        descriptor: &RecordDescriptor,
        values: &Map<String, Value>,
    ) -> Result<i64, StoreError> {
        let statement = self.generator().insert(descriptor, values)?;
        debug_log!(sql = %statement.sql, "insert");

        let id = bind_all!(
            sqlx::query_scalar::<sqlx::Sqlite, i64>(&statement.sql),
            statement.params
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
        values: &Map<String, Value>,
    ) -> Result<u64, StoreError> {
        let statement = self.generator().update(descriptor, predicate, values)?;
        debug_log!(sql = %statement.sql, "update");

        let result = bind_all!(sqlx::query::<sqlx::Sqlite>(&statement.sql), statement.params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<u64, StoreError> {
        let statement = self.generator().delete(descriptor, predicate)?;
        debug_log!(sql = %statement.sql, "delete");

        let result = bind_all!(sqlx::query::<sqlx::Sqlite>(&statement.sql), statement.params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<i64, StoreError> {
        let statement = self.generator().count(descriptor, predicate)?;
        debug_log!(sql = %statement.sql, "count");

        let total = bind_all!(
            sqlx::query_scalar::<sqlx::Sqlite, i64>(&statement.sql),
            statement.params
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_table(&self, descriptor: &RecordDescriptor) -> Result<(), StoreError> {
        let sql = self.generator().create_table(descriptor)?;
        debug_log!(sql = %sql, "ensure table");
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FieldDef;
    use serde_json::json;

    static TAG: RecordDescriptor = RecordDescriptor::new(
        "Tag",
        "tag",
        &[
            FieldDef::id("id"),
            FieldDef::text("label"),
            FieldDef::boolean("pinned"),
            FieldDef::timestamp("createdAt"),
        ],
    );

    fn values(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    async fn store() -> SqliteStore {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        store.ensure_table(&TAG).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_select_round_trip() {
        let store = store().await;
        let id = store
            .insert(
                &TAG,
                &values(json!({"label": "rust", "pinned": true, "createdAt": "2024-01-01T00:00:00.000001Z"})),
            )
            .await
            .unwrap();
        assert_eq!(id, 1);

        let rows = store.select(&SelectQuery::new(&TAG)).await.unwrap();
        assert_eq!(
            rows,
            vec![values(json!({
                "id": 1,
                "label": "rust",
                "pinned": true,
                "createdAt": "2024-01-01T00:00:00.000001Z"
            }))]
        );
    }

    #[tokio::test]
    async fn test_update_delete_count() {
        let store = store().await;
        for label in ["a", "b", "c"] {
            store
                .insert(&TAG, &values(json!({"label": label, "pinned": false})))
                .await
                .unwrap();
        }
        assert_eq!(store.count(&TAG, &Predicate::default()).await.unwrap(), 3);

        let updated = store
            .update(&TAG, &Predicate::by_id(2), &values(json!({"label": "z"})))
            .await
            .unwrap();
        assert_eq!(updated, 1);
        assert_eq!(store.count(&TAG, &Predicate::eq("label", "z")).await.unwrap(), 1);

        let removed = store.delete(&TAG, &Predicate::by_id(2)).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.delete(&TAG, &Predicate::by_id(2)).await.unwrap(), 0);
        assert_eq!(store.count(&TAG, &Predicate::all()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ping_and_idempotent_bootstrap() {
        let store = store().await;
        store.ping().await.unwrap();
        store.ensure_table(&TAG).await.unwrap();
    }
}
