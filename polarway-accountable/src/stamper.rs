//! Stamper — writes creator/updater/deleter ids and resolves them back
//!
//! A record type opts in by implementing [`Stampable`]; attaching a
//! [`Stamper`] to its [`RecordStore`](crate::store::RecordStore) turns on
//! the hooks:
//!
//! | write        | `created_by_user_id` | `updated_by_user_id` | `deleted_by_user_id` |
//! |--------------|----------------------|----------------------|----------------------|
//! | insert       | set if unset         | set                  | –                    |
//! | update       | untouched            | set                  | –                    |
//! | soft delete  | untouched            | untouched            | set                  |
//! | restore      | untouched            | untouched            | cleared              |
//!
//! Nothing is written while the resolver is disabled.
//!
//! Inside [`crate::request::with_accountable`] the task-bound resolver is
//! used instead of the one the stamper was built with, so per-request
//! impersonation and the enabled flag reach stores shared between requests.
//!
//! # Usage
//!
//! ```rust,ignore
//! let stamper = Stamper::new(accountable.clone(), actors.clone());
//! posts.observe(stamper.clone());
//!
//! posts.save(&mut post)?;
//! let author = stamper.created_by(&post);
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::{Actor, ActorId, ActorProvider};
use crate::error::Result;
use crate::resolver::Accountable;
use crate::schema::{self, Value};
use crate::store::{LifecycleHook, Record};

/// A record carrying actor stamp columns
///
/// Column names default to the conventional ones and can be overridden
/// per type.
pub trait Stampable: Record {
    const CREATED_BY_COLUMN: &'static str = schema::CREATED_BY_USER_ID;
    const UPDATED_BY_COLUMN: &'static str = schema::UPDATED_BY_USER_ID;

    /// Only used when the type also declares `SOFT_DELETE_COLUMN`
    const DELETED_BY_COLUMN: Option<&'static str> = None;

    fn created_by_user_id(&self) -> Option<ActorId> {
        self.get_attribute(Self::CREATED_BY_COLUMN)
            .and_then(|value| value.as_uuid())
    }

    fn updated_by_user_id(&self) -> Option<ActorId> {
        self.get_attribute(Self::UPDATED_BY_COLUMN)
            .and_then(|value| value.as_uuid())
    }

    fn deleted_by_user_id(&self) -> Option<ActorId> {
        Self::DELETED_BY_COLUMN
            .and_then(|column| self.get_attribute(column))
            .and_then(|value| value.as_uuid())
    }
}

/// Lifecycle hook and relationship resolver for [`Stampable`] records
#[derive(Clone)]
pub struct Stamper {
    accountable: Arc<Accountable>,
    actors: Arc<dyn ActorProvider>,
}

impl Stamper {
    pub fn new(accountable: Arc<Accountable>, actors: Arc<dyn ActorProvider>) -> Self {
        Self { accountable, actors }
    }

    pub fn accountable(&self) -> &Arc<Accountable> {
        &self.accountable
    }

    /// Resolver in effect for the running task
    pub fn active_accountable(&self) -> Arc<Accountable> {
        #[cfg(feature = "request-scope")]
        if let Some(bound) = crate::request::current() {
            return bound;
        }
        Arc::clone(&self.accountable)
    }

    // ─── Relationship Accessors ───

    /// The actor who created `record`
    pub fn created_by<R: Stampable>(&self, record: &R) -> Option<Actor> {
        self.resolve::<R>(record.created_by_user_id())
    }

    /// The actor who last saved `record`
    pub fn updated_by<R: Stampable>(&self, record: &R) -> Option<Actor> {
        self.resolve::<R>(record.updated_by_user_id())
    }

    /// The actor who soft-deleted `record`; none while the record is live
    pub fn deleted_by<R: Stampable>(&self, record: &R) -> Option<Actor> {
        if R::DELETED_BY_COLUMN.is_none() || !record.trashed() {
            return None;
        }
        self.resolve::<R>(record.deleted_by_user_id())
    }

    fn resolve<R: Record>(&self, id: Option<ActorId>) -> Option<Actor> {
        match id {
            // Soft-deleted actors keep their attribution
            Some(id) => {
                let actor = self.actors.find_with_trashed(id);
                if actor.is_none() {
                    warn!(table = R::TABLE, actor_id = %id, "Stamped actor no longer exists");
                }
                actor
            }
            None => self.active_accountable().anonymous_user(),
        }
    }

    /// Resolved id to stamp, or `None` when stamping is switched off
    fn stamp_value<R: Record>(&self, event: &'static str) -> Option<Value> {
        let accountable = self.active_accountable();
        if !accountable.is_enabled() {
            debug!(table = R::TABLE, event, "Stamping disabled, record left untouched");
            return None;
        }
        Some(accountable.current_actor_id().into())
    }
}

impl std::fmt::Debug for Stamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stamper")
            .field("accountable", &self.accountable)
            .finish_non_exhaustive()
    }
}

impl<R: Stampable> LifecycleHook<R> for Stamper {
    fn creating(&self, record: &mut R) -> Result<()> {
        let Some(value) = self.stamp_value::<R>("creating") else {
            return Ok(());
        };

        if record.created_by_user_id().is_none() {
            record.set_attribute(R::CREATED_BY_COLUMN, value.clone())?;
        }
        record.set_attribute(R::UPDATED_BY_COLUMN, value.clone())?;
        debug!(table = R::TABLE, actor = %value, "Stamped creator");
        Ok(())
    }

    fn updating(&self, record: &mut R) -> Result<()> {
        let Some(value) = self.stamp_value::<R>("updating") else {
            return Ok(());
        };

        record.set_attribute(R::UPDATED_BY_COLUMN, value.clone())?;
        debug!(table = R::TABLE, actor = %value, "Stamped updater");
        Ok(())
    }

    fn deleting(&self, record: &mut R) -> Result<()> {
        // Hard-deleted rows are gone; there is nothing to stamp
        let (Some(_), Some(column)) = (R::SOFT_DELETE_COLUMN, R::DELETED_BY_COLUMN) else {
            return Ok(());
        };
        let Some(value) = self.stamp_value::<R>("deleting") else {
            return Ok(());
        };

        record.set_attribute(column, value.clone())?;
        debug!(table = R::TABLE, actor = %value, "Stamped deleter");
        Ok(())
    }

    fn restoring(&self, record: &mut R) -> Result<()> {
        let Some(column) = R::DELETED_BY_COLUMN else {
            return Ok(());
        };
        if self.stamp_value::<R>("restoring").is_none() {
            return Ok(());
        }

        record.set_attribute(column, Value::Null)?;
        Ok(())
    }
}
