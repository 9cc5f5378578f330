//! Shared fixtures: two stampable tables, a seeded user table, a session

#![allow(dead_code)]

use std::sync::{Arc, Once};

use chrono::{DateTime, Utc};

use polarway_accountable::schema::{self, Value};
use polarway_accountable::{
    Accountable, AccountableConfig, AccountableError, Actor, ActorId, InMemoryActors, Record,
    RecordId, RecordStore, Result, SessionGuard, Stampable, Stamper,
};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ─── Records ───

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: Option<RecordId>,
    pub title: String,
    pub created_by_user_id: Option<ActorId>,
    pub updated_by_user_id: Option<ActorId>,
}

impl Record for Post {
    const TABLE: &'static str = "posts";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn get_attribute(&self, column: &str) -> Option<Value> {
        match column {
            "title" => Some(self.title.clone().into()),
            schema::CREATED_BY_USER_ID => Some(self.created_by_user_id.into()),
            schema::UPDATED_BY_USER_ID => Some(self.updated_by_user_id.into()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            "title" => self.title = value.try_into_text(column)?.unwrap_or_default(),
            schema::CREATED_BY_USER_ID => self.created_by_user_id = value.try_into_uuid(column)?,
            schema::UPDATED_BY_USER_ID => self.updated_by_user_id = value.try_into_uuid(column)?,
            _ => return Err(AccountableError::unknown_column(Self::TABLE, column)),
        }
        Ok(())
    }
}

impl Stampable for Post {}

pub fn post(title: &str) -> Post {
    Post {
        title: title.to_string(),
        ..Default::default()
    }
}

/// Soft-deletable record tracking its deleter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub id: Option<RecordId>,
    pub created_by_user_id: Option<ActorId>,
    pub updated_by_user_id: Option<ActorId>,
    pub deleted_by_user_id: Option<ActorId>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Record for Document {
    const TABLE: &'static str = "documents";
    const SOFT_DELETE_COLUMN: Option<&'static str> = Some(schema::DELETED_AT);

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    fn get_attribute(&self, column: &str) -> Option<Value> {
        match column {
            schema::CREATED_BY_USER_ID => Some(self.created_by_user_id.into()),
            schema::UPDATED_BY_USER_ID => Some(self.updated_by_user_id.into()),
            schema::DELETED_BY_USER_ID => Some(self.deleted_by_user_id.into()),
            schema::DELETED_AT => Some(self.deleted_at.into()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, column: &str, value: Value) -> Result<()> {
        match column {
            schema::CREATED_BY_USER_ID => self.created_by_user_id = value.try_into_uuid(column)?,
            schema::UPDATED_BY_USER_ID => self.updated_by_user_id = value.try_into_uuid(column)?,
            schema::DELETED_BY_USER_ID => self.deleted_by_user_id = value.try_into_uuid(column)?,
            schema::DELETED_AT => self.deleted_at = value.try_into_timestamp(column)?,
            _ => return Err(AccountableError::unknown_column(Self::TABLE, column)),
        }
        Ok(())
    }
}

impl Stampable for Document {
    const DELETED_BY_COLUMN: Option<&'static str> = Some(schema::DELETED_BY_USER_ID);
}

// ─── Fixture ───

pub struct Fixture {
    pub users: Arc<InMemoryActors>,
    pub session: Arc<SessionGuard>,
    pub accountable: Arc<Accountable>,
    pub stamper: Stamper,
    pub posts: RecordStore<Post>,
    pub documents: RecordStore<Document>,
}

impl Fixture {
    /// Three seeded users, nobody logged in
    pub fn new() -> Self {
        Self::with_config(AccountableConfig::default())
    }

    pub fn with_config(config: AccountableConfig) -> Self {
        init_tracing();

        let users = Arc::new(InMemoryActors::new());
        for name in ["Alice", "Bob", "Carol"] {
            users.insert(Actor::new(name).with_email(format!("{}@example.com", name.to_lowercase())));
        }

        let session = Arc::new(SessionGuard::new());
        let accountable = Arc::new(Accountable::new(config, session.clone()));
        let stamper = Stamper::new(accountable.clone(), users.clone());

        let posts = RecordStore::<Post>::new();
        posts.observe(stamper.clone());
        let documents = RecordStore::<Document>::new();
        documents.observe(stamper.clone());

        Self {
            users,
            session,
            accountable,
            stamper,
            posts,
            documents,
        }
    }

    pub fn first_user(&self) -> Actor {
        self.users.first().expect("seeded users")
    }

    pub fn last_user(&self) -> Actor {
        self.users.last().expect("seeded users")
    }

    pub fn acting_as(&self, actor: &Actor) {
        self.session.login(actor.clone());
    }
}
