//! Authentication module — actors, sessions, and the actor directory
//!
//! These are the collaborators the stamper consumes: who is logged in, and
//! how a stored actor id maps back to a user.

pub mod types;
pub mod guard;
pub mod directory;

pub use directory::{ActorProvider, InMemoryActors};
pub use guard::{Authenticator, SessionGuard};
pub use types::{Actor, ActorId, AnonymousUser};
