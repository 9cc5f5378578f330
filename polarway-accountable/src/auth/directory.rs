//! Actor directory — the user table relationship accessors read from
//!
//! Lookups for attribution go through [`ActorProvider::find_with_trashed`]:
//! a soft-deleted user still has to show up as the author of what they wrote.

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AccountableError, Result};

use super::types::{Actor, ActorId};

/// Read access to stored actors
pub trait ActorProvider: Send + Sync {
    /// Find a live (not soft-deleted) actor
    fn find(&self, id: ActorId) -> Option<Actor>;

    /// Find an actor including soft-deleted rows
    fn find_with_trashed(&self, id: ActorId) -> Option<Actor>;
}

/// In-memory user table with soft and hard deletes
///
/// Rows keep insertion order so `first()` / `last()` behave like a table
/// ordered by primary key.
#[derive(Debug, Default)]
pub struct InMemoryActors {
    rows: RwLock<Vec<Actor>>,
}

impl InMemoryActors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new actor
    pub fn create(&self, name: impl Into<String>) -> Actor {
        self.insert(Actor::new(name))
    }

    /// Store an actor, assigning an id when it has none
    pub fn insert(&self, mut actor: Actor) -> Actor {
        let id = *actor.id.get_or_insert_with(Uuid::new_v4);
        if actor.created_at.is_none() {
            actor.created_at = Some(Utc::now());
        }

        let mut rows = self.rows.write();
        match rows.iter_mut().find(|row| row.id == Some(id)) {
            Some(row) => *row = actor.clone(),
            None => rows.push(actor.clone()),
        }
        debug!(actor_id = %id, name = %actor.name, "Actor stored");
        actor
    }

    /// Mark an actor as deleted while keeping the row
    pub fn soft_delete(&self, id: ActorId) -> Result<Actor> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|row| row.id == Some(id))
            .ok_or(AccountableError::ActorNotFound(id))?;
        row.deleted_at = Some(Utc::now());
        info!(actor_id = %id, "Actor soft-deleted");
        Ok(row.clone())
    }

    pub fn restore(&self, id: ActorId) -> Result<Actor> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|row| row.id == Some(id))
            .ok_or(AccountableError::ActorNotFound(id))?;
        row.deleted_at = None;
        info!(actor_id = %id, "Actor restored");
        Ok(row.clone())
    }

    /// Remove the row entirely; attribution to this id is lost
    pub fn force_delete(&self, id: ActorId) -> Result<()> {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|row| row.id != Some(id));
        if rows.len() == before {
            return Err(AccountableError::ActorNotFound(id));
        }
        info!(actor_id = %id, "Actor permanently deleted");
        Ok(())
    }

    /// First live actor in insertion order
    pub fn first(&self) -> Option<Actor> {
        self.rows.read().iter().find(|row| !row.trashed()).cloned()
    }

    /// Last live actor in insertion order
    pub fn last(&self) -> Option<Actor> {
        self.rows.read().iter().rev().find(|row| !row.trashed()).cloned()
    }

    /// All live actors
    pub fn all(&self) -> Vec<Actor> {
        self.rows
            .read()
            .iter()
            .filter(|row| !row.trashed())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl ActorProvider for InMemoryActors {
    fn find(&self, id: ActorId) -> Option<Actor> {
        self.find_with_trashed(id).filter(|actor| !actor.trashed())
    }

    fn find_with_trashed(&self, id: ActorId) -> Option<Actor> {
        self.rows.read().iter().find(|row| row.id == Some(id)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find() {
        let actors = InMemoryActors::new();
        let alice = actors.create("alice");
        let id = alice.id.unwrap();

        assert_eq!(actors.find(id), Some(alice));
        assert_eq!(actors.len(), 1);
    }

    #[test]
    fn test_soft_delete_hides_from_find_only() {
        let actors = InMemoryActors::new();
        let id = actors.create("alice").id.unwrap();

        let trashed = actors.soft_delete(id).unwrap();
        assert!(trashed.trashed());
        assert!(actors.find(id).is_none());
        assert_eq!(actors.find_with_trashed(id).unwrap().name, "alice");
        assert!(actors.first().is_none());

        actors.restore(id).unwrap();
        assert!(actors.find(id).is_some());
    }

    #[test]
    fn test_force_delete() {
        let actors = InMemoryActors::new();
        let id = actors.create("alice").id.unwrap();

        actors.force_delete(id).unwrap();
        assert!(actors.find_with_trashed(id).is_none());
        assert!(matches!(
            actors.force_delete(id),
            Err(AccountableError::ActorNotFound(_))
        ));
    }

    #[test]
    fn test_first_and_last_follow_insertion_order() {
        let actors = InMemoryActors::new();
        let first = actors.create("first");
        actors.create("middle");
        let last = actors.create("last");

        assert_eq!(actors.first(), Some(first));
        assert_eq!(actors.last(), Some(last));
        assert_eq!(actors.all().len(), 3);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let actors = InMemoryActors::new();
        let first = actors.create("first");
        let last = actors.create("last");

        let renamed = actors.insert(Actor {
            name: "renamed".into(),
            ..first.clone()
        });

        assert_eq!(actors.len(), 2);
        assert_eq!(actors.first(), Some(renamed));
        assert_eq!(actors.last(), Some(last));
        assert_eq!(actors.find(first.id.unwrap()).unwrap().name, "renamed");
    }

    #[test]
    fn test_insert_assigns_missing_id() {
        let actors = InMemoryActors::new();
        let stored = actors.insert(Actor::transient("imported"));
        assert!(stored.exists());
        assert!(stored.created_at.is_some());
    }
}
