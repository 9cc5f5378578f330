//! Auth domain types — Actor, AnonymousUser
//!
//! Serializable, cloneable, and cheap to pass around.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Identifier of a user-like entity
pub type ActorId = Uuid;

/// A user that can be recorded as creator, updater or deleter of a record
///
/// Persisted actors always carry an `id`. A transient actor (built from the
/// anonymous fallback) has none and is never written to a stamp column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Option<ActorId>,
    pub name: String,
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, JsonValue>,
    pub created_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Actor {
    /// New persisted-shaped actor with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            name: name.into(),
            email: None,
            attributes: Map::new(),
            created_at: Some(Utc::now()),
            deleted_at: None,
        }
    }

    /// Unpersisted actor carrying display attributes only
    pub fn transient(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: None,
            attributes: Map::new(),
            created_at: None,
            deleted_at: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether this actor has a stored row
    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    /// Whether this actor has been soft-deleted
    pub fn trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} ({id})", self.name),
            None => write!(f, "{} (transient)", self.name),
        }
    }
}

/// Display attributes used when a record has no recorded actor
///
/// Kept as a free-form mapping so hosts can carry whatever their user
/// model displays. `name` and `email` are lifted into the matching
/// [`Actor`] fields, everything else lands in [`Actor::attributes`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnonymousUser(Map<String, JsonValue>);

impl AnonymousUser {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with("name", name.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(JsonValue::as_str)
    }

    pub fn attributes(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    /// Build the transient actor shown for anonymous records
    pub fn to_actor(&self) -> Actor {
        let mut actor = Actor::transient(self.name().unwrap_or_default());
        for (key, value) in &self.0 {
            match key.as_str() {
                "name" => {}
                "email" => actor.email = value.as_str().map(str::to_string),
                _ => {
                    actor.attributes.insert(key.clone(), value.clone());
                }
            }
        }
        actor
    }
}

impl From<Map<String, JsonValue>> for AnonymousUser {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}
