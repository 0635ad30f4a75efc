use crate::validation::IdentifierError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller input rejected before (or instead of) touching the store
    #[error("{message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Record of table {0} has not been persisted")]
    Unpersisted(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation {
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation { .. })
    }

    /// HTTP-style classification: 400 for caller mistakes, 500 for everything else
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Validation { .. } => 400,
            _ => 500,
        }
    }
}
