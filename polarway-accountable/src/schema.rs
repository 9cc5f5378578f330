//! Column names and attribute values shared by the stamper and the record store
//!
//! Every stampable table carries:
//! - `created_by_user_id` (nullable, written once on insert)
//! - `updated_by_user_id` (nullable, refreshed on every save)
//! - `deleted_by_user_id` (nullable, soft-deletable tables only)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AccountableError, Result};

// ─── Column Names (constants) ───

pub const CREATED_BY_USER_ID: &str = "created_by_user_id";
pub const UPDATED_BY_USER_ID: &str = "updated_by_user_id";
pub const DELETED_BY_USER_ID: &str = "deleted_by_user_id";
pub const DELETED_AT: &str = "deleted_at";

// ─── Attribute Values ───

/// A single column value as seen by hooks and query conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Uuid(_) => "uuid",
            Self::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// SQL equality: `NULL` never equals anything, not even `NULL`
    pub fn sql_eq(&self, other: &Value) -> bool {
        !self.is_null() && !other.is_null() && self == other
    }

    /// Convert into a nullable uuid column, rejecting other types
    pub fn try_into_uuid(self, column: &str) -> Result<Option<Uuid>> {
        match self {
            Self::Null => Ok(None),
            Self::Uuid(id) => Ok(Some(id)),
            other => Err(AccountableError::type_mismatch(column, "uuid", other.type_name())),
        }
    }

    /// Convert into a nullable text column
    pub fn try_into_text(self, column: &str) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            Self::Text(s) => Ok(Some(s)),
            other => Err(AccountableError::type_mismatch(column, "text", other.type_name())),
        }
    }

    /// Convert into a nullable timestamp column
    pub fn try_into_timestamp(self, column: &str) -> Result<Option<DateTime<Utc>>> {
        match self {
            Self::Null => Ok(None),
            Self::Timestamp(ts) => Ok(Some(ts)),
            other => Err(AccountableError::type_mismatch(
                column,
                "timestamp",
                other.type_name(),
            )),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Uuid(id) => write!(f, "'{id}'"),
            Self::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_never_equals() {
        assert!(!Value::Null.sql_eq(&Value::Null));
        assert!(!Value::Null.sql_eq(&Value::Int(1)));
        assert!(Value::Int(1).sql_eq(&Value::Int(1)));
    }

    #[test]
    fn test_option_conversion() {
        let id = Uuid::new_v4();
        assert_eq!(Value::from(Some(id)), Value::Uuid(id));
        assert_eq!(Value::from(None::<Uuid>), Value::Null);
    }

    #[test]
    fn test_uuid_column_rejects_text() {
        let err = Value::from("alice").try_into_uuid(CREATED_BY_USER_ID).unwrap_err();
        assert!(matches!(err, AccountableError::TypeMismatch { .. }));
        assert_eq!(Value::Null.try_into_uuid(CREATED_BY_USER_ID).unwrap(), None);
    }

    #[test]
    fn test_value_serialization() {
        let json = serde_json::to_string(&Value::Int(7)).unwrap();
        assert_eq!(json, r#"{"int":7}"#);
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Value::Int(7));
    }
}
