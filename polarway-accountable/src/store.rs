//! RecordStore — in-memory persistence layer with lifecycle hooks
//!
//! Provides the write lifecycle the stamper plugs into: every insert,
//! update, soft delete and restore first runs the registered
//! [`LifecycleHook`]s against the mutable record, then commits it.
//! All operations return `Result<T, AccountableError>` (railway programming).
//!
//! # Example
//!
//! ```rust
//! use polarway_accountable::schema::Value;
//! use polarway_accountable::store::{Record, RecordId, RecordStore};
//! use polarway_accountable::{AccountableError, Result};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Note {
//!     id: Option<RecordId>,
//!     body: String,
//! }
//!
//! impl Record for Note {
//!     const TABLE: &'static str = "notes";
//!
//!     fn id(&self) -> Option<RecordId> { self.id }
//!     fn set_id(&mut self, id: RecordId) { self.id = Some(id); }
//!
//!     fn get_attribute(&self, column: &str) -> Option<Value> {
//!         match column {
//!             "body" => Some(self.body.clone().into()),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_attribute(&mut self, column: &str, value: Value) -> Result<()> {
//!         match column {
//!             "body" => self.body = value.try_into_text(column)?.unwrap_or_default(),
//!             _ => return Err(AccountableError::unknown_column(Self::TABLE, column)),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let notes = RecordStore::<Note>::new();
//! let mut note = Note { body: "hello".into(), ..Default::default() };
//! notes.save(&mut note)?;
//!
//! let found = notes.get(&notes.query().where_eq("body", "hello"));
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{AccountableError, Result};
use crate::schema::Value;

/// Primary key assigned by the store on insert
pub type RecordId = u64;

/// A persistable entity addressed by column name
pub trait Record: Clone + Send + Sync + 'static {
    /// Table name, used in logs and errors
    const TABLE: &'static str;

    /// Column holding the deletion timestamp; `None` means deletes are hard
    const SOFT_DELETE_COLUMN: Option<&'static str> = None;

    fn id(&self) -> Option<RecordId>;

    fn set_id(&mut self, id: RecordId);

    /// Read a column; `None` when the record has no such column
    fn get_attribute(&self, column: &str) -> Option<Value>;

    /// Write a column; unknown columns and wrong types are errors
    fn set_attribute(&mut self, column: &str, value: Value) -> Result<()>;

    /// Whether the record is soft-deleted
    fn trashed(&self) -> bool {
        Self::SOFT_DELETE_COLUMN
            .and_then(|column| self.get_attribute(column))
            .is_some_and(|value| !value.is_null())
    }
}

/// Callbacks invoked synchronously before a write is committed
///
/// Every callback receives a working copy of the record; changes made here
/// are what gets stored. Returning an error aborts the write and leaves the
/// caller's record untouched.
pub trait LifecycleHook<R: Record>: Send + Sync {
    fn creating(&self, _record: &mut R) -> Result<()> {
        Ok(())
    }

    fn updating(&self, _record: &mut R) -> Result<()> {
        Ok(())
    }

    /// Runs before both soft and hard deletes
    fn deleting(&self, _record: &mut R) -> Result<()> {
        Ok(())
    }

    fn restoring(&self, _record: &mut R) -> Result<()> {
        Ok(())
    }
}

// ─── Query ───

/// A single filter over record columns
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = value` with SQL semantics: comparing with NULL never matches
    Eq { column: String, value: Value },
    IsNull(String),
    NotNull(String),
    /// Matches no rows
    Nothing,
}

impl Condition {
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Self::Eq { column, value } => record
                .get_attribute(column)
                .is_some_and(|actual| actual.sql_eq(value)),
            Self::IsNull(column) => record
                .get_attribute(column)
                .is_some_and(|actual| actual.is_null()),
            Self::NotNull(column) => record
                .get_attribute(column)
                .is_some_and(|actual| !actual.is_null()),
            Self::Nothing => false,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq { column, value } => write!(f, "{column} = {value}"),
            Self::IsNull(column) => write!(f, "{column} IS NULL"),
            Self::NotNull(column) => write!(f, "{column} IS NOT NULL"),
            Self::Nothing => f.write_str("FALSE"),
        }
    }
}

/// Conjunction of conditions over one record type
#[derive(Debug, Clone)]
pub struct Query<R> {
    conditions: Vec<Condition>,
    with_trashed: bool,
    _record: PhantomData<fn() -> R>,
}

impl<R> Default for Query<R> {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            with_trashed: false,
            _record: PhantomData,
        }
    }
}

impl<R: Record> Query<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn where_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Condition::Eq {
            column: column.into(),
            value: value.into(),
        })
    }

    pub fn where_null(self, column: impl Into<String>) -> Self {
        self.filter(Condition::IsNull(column.into()))
    }

    pub fn where_not_null(self, column: impl Into<String>) -> Self {
        self.filter(Condition::NotNull(column.into()))
    }

    /// Include soft-deleted rows
    pub fn with_trashed(mut self) -> Self {
        self.with_trashed = true;
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, record: &R) -> bool {
        (self.with_trashed || !record.trashed())
            && self.conditions.iter().all(|c| c.matches(record))
    }
}

// ─── Store ───

/// In-memory table for one record type
///
/// Thread-safe: can be shared across tasks via `Arc<RecordStore<R>>`.
pub struct RecordStore<R: Record> {
    rows: RwLock<BTreeMap<RecordId, R>>,
    next_id: AtomicU64,
    hooks: RwLock<Vec<Arc<dyn LifecycleHook<R>>>>,
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            hooks: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lifecycle hook; hooks run in registration order
    pub fn observe(&self, hook: impl LifecycleHook<R> + 'static) {
        self.hooks.write().push(Arc::new(hook));
    }

    fn hooks(&self) -> Vec<Arc<dyn LifecycleHook<R>>> {
        self.hooks.read().clone()
    }

    fn existing_id(record: &R) -> Result<RecordId> {
        record
            .id()
            .ok_or_else(|| AccountableError::NotPersisted(R::TABLE.to_string()))
    }

    fn ensure_stored(&self, id: RecordId) -> Result<()> {
        if self.rows.read().contains_key(&id) {
            Ok(())
        } else {
            Err(AccountableError::RecordNotFound {
                table: R::TABLE.to_string(),
                id,
            })
        }
    }

    // ─── Writes ───

    /// Insert when the record has no id yet, update otherwise
    pub fn save(&self, record: &mut R) -> Result<()> {
        match record.id() {
            None => self.insert(record),
            Some(_) => self.update(record),
        }
    }

    pub fn insert(&self, record: &mut R) -> Result<()> {
        let mut staged = record.clone();
        for hook in self.hooks() {
            hook.creating(&mut staged)?;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        staged.set_id(id);
        self.rows.write().insert(id, staged.clone());
        *record = staged;
        debug!(table = R::TABLE, id, "Record inserted");
        Ok(())
    }

    pub fn update(&self, record: &mut R) -> Result<()> {
        let id = Self::existing_id(record)?;
        self.ensure_stored(id)?;

        let mut staged = record.clone();
        for hook in self.hooks() {
            hook.updating(&mut staged)?;
        }

        self.rows.write().insert(id, staged.clone());
        *record = staged;
        debug!(table = R::TABLE, id, "Record updated");
        Ok(())
    }

    /// Soft delete when the table supports it, hard delete otherwise
    pub fn delete(&self, record: &mut R) -> Result<()> {
        let id = Self::existing_id(record)?;
        self.ensure_stored(id)?;

        let mut staged = record.clone();
        for hook in self.hooks() {
            hook.deleting(&mut staged)?;
        }

        match R::SOFT_DELETE_COLUMN {
            Some(column) => {
                staged.set_attribute(column, Utc::now().into())?;
                self.rows.write().insert(id, staged.clone());
                debug!(table = R::TABLE, id, "Record soft-deleted");
            }
            None => {
                self.rows.write().remove(&id);
                debug!(table = R::TABLE, id, "Record deleted");
            }
        }
        *record = staged;
        Ok(())
    }

    /// Remove a row without running hooks
    pub fn force_delete(&self, id: RecordId) -> Result<R> {
        let removed = self.rows.write().remove(&id).ok_or_else(|| {
            AccountableError::RecordNotFound {
                table: R::TABLE.to_string(),
                id,
            }
        })?;
        debug!(table = R::TABLE, id, "Record permanently deleted");
        Ok(removed)
    }

    /// Undo a soft delete
    pub fn restore(&self, record: &mut R) -> Result<()> {
        let column = R::SOFT_DELETE_COLUMN
            .ok_or_else(|| AccountableError::SoftDeletesUnsupported(R::TABLE.to_string()))?;
        let id = Self::existing_id(record)?;
        self.ensure_stored(id)?;

        let mut staged = record.clone();
        for hook in self.hooks() {
            hook.restoring(&mut staged)?;
        }

        staged.set_attribute(column, Value::Null)?;
        self.rows.write().insert(id, staged.clone());
        *record = staged;
        debug!(table = R::TABLE, id, "Record restored");
        Ok(())
    }

    // ─── Reads ───

    /// Find a live record
    pub fn find(&self, id: RecordId) -> Option<R> {
        self.find_with_trashed(id).filter(|record| !record.trashed())
    }

    pub fn find_with_trashed(&self, id: RecordId) -> Option<R> {
        self.rows.read().get(&id).cloned()
    }

    /// Start a query over this table
    pub fn query(&self) -> Query<R> {
        Query::new()
    }

    /// Rows matching `query`, ordered by id
    pub fn get(&self, query: &Query<R>) -> Vec<R> {
        self.rows
            .read()
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect()
    }

    pub fn first(&self, query: &Query<R>) -> Option<R> {
        self.rows
            .read()
            .values()
            .find(|record| query.matches(record))
            .cloned()
    }

    pub fn count(&self, query: &Query<R>) -> usize {
        self.rows
            .read()
            .values()
            .filter(|record| query.matches(record))
            .count()
    }

    /// All live rows
    pub fn all(&self) -> Vec<R> {
        self.get(&Query::new())
    }
}
