//! Authentication collaborator — who is logged in right now
//!
//! The stamper never authenticates anybody. It only asks an
//! [`Authenticator`] for the current user at save time.

use parking_lot::RwLock;
use tracing::debug;

use super::types::Actor;

/// Source of the authenticated user for the current execution context
pub trait Authenticator: Send + Sync {
    fn authenticated_user(&self) -> Option<Actor>;
}

impl<F> Authenticator for F
where
    F: Fn() -> Option<Actor> + Send + Sync,
{
    fn authenticated_user(&self) -> Option<Actor> {
        self()
    }
}

/// In-memory session guard
///
/// Holds at most one logged-in actor. Hosts with a real auth stack
/// implement [`Authenticator`] on their own session type instead.
#[derive(Debug, Default)]
pub struct SessionGuard {
    user: RwLock<Option<Actor>>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, actor: Actor) {
        debug!(actor = %actor, "Session opened");
        *self.user.write() = Some(actor);
    }

    pub fn logout(&self) {
        if self.user.write().take().is_some() {
            debug!("Session closed");
        }
    }

    /// Whether someone is logged in
    pub fn check(&self) -> bool {
        self.user.read().is_some()
    }

    pub fn user(&self) -> Option<Actor> {
        self.user.read().clone()
    }
}

impl Authenticator for SessionGuard {
    fn authenticated_user(&self) -> Option<Actor> {
        self.user()
    }
}
