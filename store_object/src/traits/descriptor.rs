//! Per-type record configuration

use crate::errors::StoreError;
use crate::validation::{ValidatedFieldName, ValidatedTableName};

/// Column kind of a declared field, used when bootstrapping tables and when
/// a backend needs an explicit cast for a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Auto-generated integer primary key
    Id,
    Text,
    Integer,
    Real,
    Boolean,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    pub const fn id(name: &'static str) -> Self {
        Self::new(name, FieldKind::Id)
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn real(name: &'static str) -> Self {
        Self::new(name, FieldKind::Real)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub const fn timestamp(name: &'static str) -> Self {
        Self::new(name, FieldKind::Timestamp)
    }
}

/// Static description of a record type: where it lives and how it is cached
///
/// ```
/// use store_object::{FieldDef, RecordDescriptor};
///
/// static TEAM: RecordDescriptor = RecordDescriptor::new(
///     "Team",
///     "team",
///     &[
///         FieldDef::id("id"),
///         FieldDef::text("name"),
///         FieldDef::timestamp("createdAt"),
///         FieldDef::timestamp("updatedAt"),
///     ],
/// )
/// .with_cache_time(60);
///
/// assert_eq!(TEAM.cache_key(7), "team:7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    /// Type name, lower-cased into the cache key namespace
    pub name: &'static str,
    pub table: &'static str,
    /// Declared columns in normalized order
    pub fields: &'static [FieldDef],
    pub use_cache: bool,
    /// Cache entry lifetime in seconds
    pub cache_time: u64,
}

impl RecordDescriptor {
    pub const DEFAULT_CACHE_TIME: u64 = 1800;

    pub const fn new(name: &'static str, table: &'static str, fields: &'static [FieldDef]) -> Self {
        Self {
            name,
            table,
            fields,
            use_cache: true,
            cache_time: Self::DEFAULT_CACHE_TIME,
        }
    }

    pub const fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub const fn with_cache_time(mut self, seconds: u64) -> Self {
        self.cache_time = seconds;
        self
    }

    pub fn cache_key_prefix(&self) -> String {
        format!("{}:", self.name.to_lowercase())
    }

    pub fn cache_key(&self, id: i64) -> String {
        format!("{}{}", self.cache_key_prefix(), id)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|field| field.kind)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.name.to_string()).collect()
    }

    /// Check the table and every field name, and require exactly one `id` key column
    pub fn validate(&self) -> Result<(), StoreError> {
        ValidatedTableName::new(self.table)?;
        for field in self.fields {
            ValidatedFieldName::new(field.name)?;
        }

        let id_columns: Vec<_> = self
            .fields
            .iter()
            .filter(|field| field.kind == FieldKind::Id)
            .collect();
        match id_columns.as_slice() {
            [field] if field.name == "id" => Ok(()),
            _ => Err(StoreError::InvalidRecord(format!(
                "{} must declare exactly one id column named 'id'",
                self.name
            ))),
        }
    }
}
