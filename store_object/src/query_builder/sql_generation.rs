//! SQL text generation
//!
//! Every statement is built from validated, double-quoted identifiers and
//! numbered `$N` placeholders, which both PostgreSQL and SQLite accept.
//! Rows are projected as a single JSON object column so that one decoding
//! path serves every record type.

use crate::errors::StoreError;
use crate::query_builder::ordering::OrderBy;
use crate::query_builder::predicate::{render_raw, Predicate};
use crate::traits::descriptor::{FieldKind, RecordDescriptor};
use crate::traits::record_store::SelectQuery;
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// SQL text plus the values for its placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Collects bound values and hands out their placeholders
#[derive(Debug, Default)]
pub(crate) struct ParamSink {
    values: Vec<Value>,
}

impl ParamSink {
    pub(crate) fn push(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    fn into_statement(self, sql: String) -> Statement {
        Statement {
            sql,
            params: self.values,
        }
    }
}

pub struct SqlGenerator {
    dialect: Dialect,
}

impl SqlGenerator {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn select(&self, query: &SelectQuery) -> Result<Statement, StoreError> {
        let descriptor = query.descriptor;
        let table = ValidatedTableName::new(descriptor.table)?;
        let projection = self.build_projection(descriptor, &query.fields)?;

        let mut sink = ParamSink::default();
        let mut sql = format!("SELECT {} AS record FROM {}", projection, table.quoted());
        sql.push_str(&self.build_where_clause(descriptor, &query.predicate, &mut sink)?);
        sql.push_str(&Self::build_order_clause(query.order_by.as_ref())?);
        sql.push_str(&self.build_window_clause(query.limit, query.offset));

        Ok(sink.into_statement(sql))
    }

    pub fn count(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<Statement, StoreError> {
        let table = ValidatedTableName::new(descriptor.table)?;
        let mut sink = ParamSink::default();
        let mut sql = format!("SELECT COUNT(*) AS total FROM {}", table.quoted());
        sql.push_str(&self.build_where_clause(descriptor, predicate, &mut sink)?);
        Ok(sink.into_statement(sql))
    }

    /// INSERT of the given columns, returning the generated id
    pub fn insert(
        &self,
        descriptor: &RecordDescriptor,
        values: &Map<String, Value>,
    ) -> Result<Statement, StoreError> {
        let table = ValidatedTableName::new(descriptor.table)?;
        if values.is_empty() {
            return Ok(Statement {
                sql: format!("INSERT INTO {} DEFAULT VALUES RETURNING \"id\"", table.quoted()),
                params: Vec::new(),
            });
        }

        let mut sink = ParamSink::default();
        let mut columns = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        for (name, value) in values {
            let field = ValidatedFieldName::new(name)?;
            columns.push(field.quoted());
            placeholders.push(self.placeholder(descriptor, name, value.clone(), &mut sink));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
            table.quoted(),
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok(sink.into_statement(sql))
    }

    /// SET values take the first placeholders, the WHERE clause continues the count
    pub fn update(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
        values: &Map<String, Value>,
    ) -> Result<Statement, StoreError> {
        let table = ValidatedTableName::new(descriptor.table)?;
        if values.is_empty() {
            return Err(StoreError::validation("Nothing to update"));
        }

        let mut sink = ParamSink::default();
        let mut assignments = Vec::with_capacity(values.len());
        for (name, value) in values {
            let field = ValidatedFieldName::new(name)?;
            let placeholder = self.placeholder(descriptor, name, value.clone(), &mut sink);
            assignments.push(format!("{} = {}", field.quoted(), placeholder));
        }

        let mut sql = format!("UPDATE {} SET {}", table.quoted(), assignments.join(", "));
        sql.push_str(&self.build_where_clause(descriptor, predicate, &mut sink)?);
        Ok(sink.into_statement(sql))
    }

    pub fn delete(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
    ) -> Result<Statement, StoreError> {
        let table = ValidatedTableName::new(descriptor.table)?;
        let mut sink = ParamSink::default();
        let mut sql = format!("DELETE FROM {}", table.quoted());
        sql.push_str(&self.build_where_clause(descriptor, predicate, &mut sink)?);
        Ok(sink.into_statement(sql))
    }

    pub fn create_table(&self, descriptor: &RecordDescriptor) -> Result<String, StoreError> {
        descriptor.validate()?;
        let table = ValidatedTableName::new(descriptor.table)?;

        let columns = descriptor
            .fields
            .iter()
            .map(|field| -> Result<String, StoreError> {
                let name = ValidatedFieldName::new(field.name)?;
                Ok(format!("{} {}", name.quoted(), self.column_type(field.kind)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            table.quoted(),
            columns.join(", ")
        ))
    }

    fn column_type(&self, kind: FieldKind) -> &'static str {
        match (self.dialect, kind) {
            (Dialect::Postgres, FieldKind::Id) => "BIGSERIAL PRIMARY KEY",
            (Dialect::Postgres, FieldKind::Text) => "TEXT",
            (Dialect::Postgres, FieldKind::Integer) => "BIGINT",
            (Dialect::Postgres, FieldKind::Real) => "DOUBLE PRECISION",
            (Dialect::Postgres, FieldKind::Boolean) => "BOOLEAN",
            (Dialect::Postgres, FieldKind::Timestamp) => "TIMESTAMPTZ",
            (Dialect::Sqlite, FieldKind::Id) => "INTEGER PRIMARY KEY AUTOINCREMENT",
            (Dialect::Sqlite, FieldKind::Text) => "TEXT",
            (Dialect::Sqlite, FieldKind::Integer) => "INTEGER",
            (Dialect::Sqlite, FieldKind::Real) => "REAL",
            (Dialect::Sqlite, FieldKind::Boolean) => "BOOLEAN",
            (Dialect::Sqlite, FieldKind::Timestamp) => "TEXT",
        }
    }

    /// Timestamps travel as RFC 3339 text; PostgreSQL needs the cast spelled out
    fn placeholder(
        &self,
        descriptor: &RecordDescriptor,
        field: &str,
        value: Value,
        sink: &mut ParamSink,
    ) -> String {
        let placeholder = sink.push(value);
        match (self.dialect, descriptor.kind_of(field)) {
            (Dialect::Postgres, Some(FieldKind::Timestamp)) => {
                format!("{}::timestamptz", placeholder)
            }
            _ => placeholder,
        }
    }

    fn build_projection(
        &self,
        descriptor: &RecordDescriptor,
        fields: &[String],
    ) -> Result<String, StoreError> {
        if fields.is_empty() {
            return Err(StoreError::validation("At least one field must be selected"));
        }

        let mut pairs = Vec::with_capacity(fields.len());
        for name in fields {
            let kind = descriptor.kind_of(name).ok_or_else(|| {
                StoreError::validation(format!("Unknown field '{}' for {}", name, descriptor.name))
            })?;
            let field = ValidatedFieldName::new(name)?;
            let value = match (self.dialect, kind) {
                // SQLite keeps booleans as 0/1
                (Dialect::Sqlite, FieldKind::Boolean) => format!(
                    "json(CASE {} WHEN 0 THEN 'false' WHEN 1 THEN 'true' END)",
                    field.quoted()
                ),
                _ => field.quoted(),
            };
            pairs.push(format!("'{}', {}", field.as_str(), value));
        }

        Ok(match self.dialect {
            Dialect::Postgres => format!("json_build_object({})::text", pairs.join(", ")),
            Dialect::Sqlite => format!("json_object({})", pairs.join(", ")),
        })
    }

    /// Returns the clause with a leading space, or nothing for an empty filter
    fn build_where_clause(
        &self,
        descriptor: &RecordDescriptor,
        predicate: &Predicate,
        sink: &mut ParamSink,
    ) -> Result<String, StoreError> {
        match predicate {
            Predicate::Equality(pairs) if pairs.is_empty() => Ok(String::new()),
            Predicate::Equality(pairs) => {
                let mut conditions = Vec::with_capacity(pairs.len());
                for (name, value) in pairs {
                    let field = ValidatedFieldName::new(name)?;
                    if value.is_null() {
                        conditions.push(format!("{} IS NULL", field.quoted()));
                    } else {
                        let placeholder = self.placeholder(descriptor, name, value.clone(), sink);
                        conditions.push(format!("{} = {}", field.quoted(), placeholder));
                    }
                }
                Ok(format!(" WHERE {}", conditions.join(" AND ")))
            }
            Predicate::Raw { sql, params } => {
                let rendered = render_raw(sql, params, sink)?;
                Ok(format!(" WHERE {}", rendered))
            }
        }
    }

    fn build_order_clause(order_by: Option<&OrderBy>) -> Result<String, StoreError> {
        match order_by {
            None => Ok(String::new()),
            Some(OrderBy::Column(name, order)) => {
                let field = ValidatedFieldName::new(name)?;
                Ok(format!(" ORDER BY {} {}", field.quoted(), order.to_sql()))
            }
            Some(OrderBy::Raw(expression)) => Ok(format!(" ORDER BY {}", expression)),
        }
    }

    fn build_window_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (self.dialect, limit, offset) {
            (_, None, None) => String::new(),
            (_, Some(limit), None) => format!(" LIMIT {}", limit),
            (_, Some(limit), Some(offset)) => format!(" LIMIT {} OFFSET {}", limit, offset),
            (Dialect::Postgres, None, Some(offset)) => format!(" OFFSET {}", offset),
            // SQLite only accepts OFFSET after a LIMIT
            (Dialect::Sqlite, None, Some(offset)) => format!(" LIMIT -1 OFFSET {}", offset),
        }
    }
}
