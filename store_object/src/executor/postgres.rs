//! PostgreSQL backend

use crate::debug_log;
use crate::errors::StoreError;
use crate::executor::decode_record;
use crate::query_builder::{Dialect, Predicate, SqlGenerator};
use crate::traits::{RecordDescriptor, RecordStore, SelectQuery};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn generator(&self) -> SqlGenerator {
        SqlGenerator::new(Dialect::Postgres)
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Map<String, Value>>, StoreError> {
        let statement = self.generator().select(query)?;
        debug_log!(sql = %statement.sql, params = statement.params.len(), "select");

        let rows = bind_all!(
            sqlx::query_scalar::<sqlx::Postgres, String>(&statement.sql),
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
            sqlx::query_scalar::<sqlx::Postgres, i64>(&statement.sql),
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

        let result = bind_all!(sqlx::query::<sqlx::Postgres>(&statement.sql), statement.params)
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

        let result = bind_all!(sqlx::query::<sqlx::Postgres>(&statement.sql), statement.params)
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
            sqlx::query_scalar::<sqlx::Postgres, i64>(&statement.sql),
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
