//! # Polarway Accountable
//!
//! Records who created, updated and deleted every row — with impersonation,
//! a global on/off switch, an anonymous display fallback, and creator query
//! scopes.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │           polarway-accountable            │
//! ├──────────────────────┬────────────────────┤
//! │     Accountable      │      Stamper       │
//! │  (impersonation,     │  (creating /       │
//! │   enabled switch,    │   updating hooks,  │
//! │   anonymous user)    │   created_by, mine)│
//! ├──────────────────────┴────────────────────┤
//! │   Authenticator          ActorProvider    │
//! │   (who is logged in)     (users table)    │
//! ├───────────────────────────────────────────┤
//! │               RecordStore                 │
//! │  (lifecycle hooks, soft deletes, queries) │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use polarway_accountable::schema::{self, Value};
//! use polarway_accountable::store::{Record, RecordId, RecordStore};
//! use polarway_accountable::{
//!     Accountable, AccountableConfig, AccountableError, AccountableScopes, ActorId,
//!     InMemoryActors, Result, SessionGuard, Stampable, Stamper,
//! };
//!
//! #[derive(Debug, Clone, Default)]
//! struct Invoice {
//!     id: Option<RecordId>,
//!     created_by_user_id: Option<ActorId>,
//!     updated_by_user_id: Option<ActorId>,
//! }
//!
//! impl Record for Invoice {
//!     const TABLE: &'static str = "invoices";
//!
//!     fn id(&self) -> Option<RecordId> { self.id }
//!     fn set_id(&mut self, id: RecordId) { self.id = Some(id); }
//!
//!     fn get_attribute(&self, column: &str) -> Option<Value> {
//!         match column {
//!             schema::CREATED_BY_USER_ID => Some(self.created_by_user_id.into()),
//!             schema::UPDATED_BY_USER_ID => Some(self.updated_by_user_id.into()),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_attribute(&mut self, column: &str, value: Value) -> Result<()> {
//!         match column {
//!             schema::CREATED_BY_USER_ID => self.created_by_user_id = value.try_into_uuid(column)?,
//!             schema::UPDATED_BY_USER_ID => self.updated_by_user_id = value.try_into_uuid(column)?,
//!             _ => return Err(AccountableError::unknown_column(Self::TABLE, column)),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! impl Stampable for Invoice {}
//!
//! # fn main() -> Result<()> {
//! let users = Arc::new(InMemoryActors::new());
//! let session = Arc::new(SessionGuard::new());
//! let accountable = Arc::new(Accountable::new(AccountableConfig::default(), session.clone()));
//!
//! let invoices = RecordStore::<Invoice>::new();
//! let stamper = Stamper::new(accountable.clone(), users.clone());
//! invoices.observe(stamper.clone());
//!
//! let alice = users.create("alice");
//! session.login(alice.clone());
//!
//! let mut invoice = Invoice::default();
//! invoices.save(&mut invoice)?;
//!
//! assert_eq!(invoice.created_by_user_id, alice.id);
//! assert_eq!(stamper.created_by(&invoice), Some(alice));
//! assert_eq!(invoices.get(&invoices.query().mine(&accountable)).len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Creator / updater stamps**: `created_by_user_id` once, `updated_by_user_id` on every save
//! - **Deleter stamps**: `deleted_by_user_id` on soft delete, cleared on restore
//! - **Impersonation**: `act_as` attributes writes to another actor until `reset`
//! - **Escape hatch**: `disable()` / `without_stamping` let caller-supplied values win
//! - **Anonymous fallback**: display-only actor for rows written by nobody
//! - **Scopes**: `only_created_by(actor)` and `mine()`, which never matches when nobody is resolved
//! - **Request scope**: task-local resolver so state never leaks between requests
//! - **Railway Programming**: store operations return `Result<T, AccountableError>`

pub mod auth;
pub mod config;
pub mod error;
pub mod resolver;
pub mod schema;
pub mod scopes;
pub mod stamper;
pub mod store;

#[cfg(feature = "request-scope")]
pub mod request;

// Re-exports for convenience
pub use auth::{Actor, ActorId, ActorProvider, AnonymousUser, Authenticator, InMemoryActors, SessionGuard};
pub use config::AccountableConfig;
pub use error::{AccountableError, Result};
pub use resolver::Accountable;
pub use scopes::AccountableScopes;
pub use stamper::{Stampable, Stamper};
pub use store::{Condition, LifecycleHook, Query, Record, RecordId, RecordStore};
