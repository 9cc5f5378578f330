//! Error types for polarway-accountable — Railway Programming
//!
//! Actor resolution and relationship accessors are total and never fail.
//! Errors only come from the record store, i.e. the persistence layer the
//! stamper is attached to, and from configuration loading.

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for store and configuration operations
#[derive(Error, Debug)]
pub enum AccountableError {
    // ─── Persistence Errors ───

    #[error("Unknown column: {table}.{column}")]
    UnknownColumn { table: String, column: String },

    #[error("Type mismatch on {column}: expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Record not found: table={table}, id={id}")]
    RecordNotFound { table: String, id: u64 },

    #[error("Record not persisted yet: {0}")]
    NotPersisted(String),

    #[error("Table does not support soft deletes: {0}")]
    SoftDeletesUnsupported(String),

    // ─── Actor Directory Errors ───

    #[error("Actor not found: {0}")]
    ActorNotFound(Uuid),

    // ─── Infrastructure Errors ───

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AccountableError {
    pub fn unknown_column(table: &str, column: &str) -> Self {
        AccountableError::UnknownColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn type_mismatch(column: &str, expected: &str, actual: &str) -> Self {
        AccountableError::TypeMismatch {
            column: column.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<serde_json::Error> for AccountableError {
    fn from(err: serde_json::Error) -> Self {
        AccountableError::Serialization(err.to_string())
    }
}

/// Result type alias for accountable operations
pub type Result<T> = std::result::Result<T, AccountableError>;
