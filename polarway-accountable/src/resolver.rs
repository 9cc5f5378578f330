//! Accountable — the actor resolver
//!
//! Decides which actor a write is attributed to:
//!
//! ```text
//! impersonation override ──▶ authenticated user ──▶ none
//! ```
//!
//! One resolver belongs to one execution context (a request, a job, a
//! test). Build a fresh one per request with [`Accountable::fork`] or bind
//! it to a task with [`crate::request::with_accountable`]; sharing a single
//! resolver across unrelated requests leaks impersonation and the enabled
//! flag between them.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use polarway_accountable::{Accountable, AccountableConfig, Actor, SessionGuard};
//!
//! let guard = Arc::new(SessionGuard::new());
//! let accountable = Accountable::new(AccountableConfig::default(), guard.clone());
//!
//! let alice = Actor::new("alice");
//! guard.login(alice.clone());
//! assert_eq!(accountable.current_actor(), Some(alice));
//!
//! let admin_as_bob = Actor::new("bob");
//! accountable.act_as(admin_as_bob.clone());
//! assert_eq!(accountable.current_actor(), Some(admin_as_bob));
//!
//! accountable.reset();
//! assert_eq!(accountable.current_actor().map(|a| a.name), Some("alice".to_string()));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::auth::{Actor, ActorId, AnonymousUser, Authenticator};
use crate::config::AccountableConfig;

struct ResolverState {
    impersonator: Option<Actor>,
    enabled: bool,
    anonymous: Option<AnonymousUser>,
}

impl ResolverState {
    fn from_config(config: &AccountableConfig) -> Self {
        Self {
            impersonator: None,
            enabled: config.enabled,
            anonymous: config.anonymous_user.clone(),
        }
    }
}

/// Request-scoped actor resolver
pub struct Accountable {
    config: AccountableConfig,
    auth: Arc<dyn Authenticator>,
    state: RwLock<ResolverState>,
}

impl Accountable {
    pub fn new(config: AccountableConfig, auth: Arc<dyn Authenticator>) -> Self {
        let state = RwLock::new(ResolverState::from_config(&config));
        Self { config, auth, state }
    }

    /// Resolver for contexts without any authentication (CLI imports, seeders)
    pub fn guest(config: AccountableConfig) -> Self {
        Self::new(config, Arc::new(|| None::<Actor>))
    }

    /// Fresh resolver for a new execution context
    ///
    /// Shares the authenticator, starts from the configured defaults, and
    /// carries none of this resolver's runtime changes.
    pub fn fork(&self) -> Self {
        Self::new(self.config.clone(), Arc::clone(&self.auth))
    }

    pub fn config(&self) -> &AccountableConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.auth
    }

    // ─── Resolution ───

    /// The actor writes are attributed to right now
    pub fn current_actor(&self) -> Option<Actor> {
        if let Some(actor) = self.state.read().impersonator.clone() {
            return Some(actor);
        }
        self.auth.authenticated_user()
    }

    /// Id written into stamp columns; `None` for anonymous or transient actors
    pub fn current_actor_id(&self) -> Option<ActorId> {
        self.current_actor().and_then(|actor| actor.id)
    }

    // ─── Impersonation ───

    /// Attribute writes to `actor` until [`Accountable::reset`]
    ///
    /// The authenticator is left alone; only attribution changes.
    pub fn act_as(&self, actor: Actor) {
        info!(actor = %actor, "Impersonation started");
        self.state.write().impersonator = Some(actor);
    }

    /// Drop the impersonation override
    pub fn reset(&self) {
        if let Some(actor) = self.state.write().impersonator.take() {
            info!(actor = %actor, "Impersonation ended");
        }
    }

    pub fn is_impersonating(&self) -> bool {
        self.state.read().impersonator.is_some()
    }

    pub fn impersonator(&self) -> Option<Actor> {
        self.state.read().impersonator.clone()
    }

    // ─── Enabled Switch ───

    pub fn is_enabled(&self) -> bool {
        self.state.read().enabled
    }

    pub fn enable(&self) {
        self.state.write().enabled = true;
        info!("Stamping enabled");
    }

    /// Stop stamping so caller-supplied values win (bulk imports, migrations)
    pub fn disable(&self) {
        self.state.write().enabled = false;
        info!("Stamping disabled");
    }

    /// Run `f` with stamping disabled, restoring the previous flag afterwards
    pub fn without_stamping<T>(&self, f: impl FnOnce() -> T) -> T {
        let previous = std::mem::replace(&mut self.state.write().enabled, false);
        let _restore = RestoreEnabled {
            accountable: self,
            previous,
        };
        debug!("Stamping suspended");
        f()
    }

    // ─── Anonymous Fallback ───

    pub fn anonymous_user_attributes(&self) -> Option<AnonymousUser> {
        self.state.read().anonymous.clone()
    }

    pub fn set_anonymous_user(&self, attributes: impl Into<AnonymousUser>) {
        let attributes = attributes.into();
        debug!(name = ?attributes.name(), "Anonymous fallback configured");
        self.state.write().anonymous = Some(attributes);
    }

    pub fn clear_anonymous_user(&self) {
        self.state.write().anonymous = None;
    }

    /// Transient actor built from the fallback, if one is configured
    pub fn anonymous_user(&self) -> Option<Actor> {
        self.state.read().anonymous.as_ref().map(AnonymousUser::to_actor)
    }
}

impl fmt::Debug for Accountable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Accountable")
            .field("enabled", &state.enabled)
            .field("impersonator", &state.impersonator)
            .field("anonymous", &state.anonymous)
            .finish_non_exhaustive()
    }
}

struct RestoreEnabled<'a> {
    accountable: &'a Accountable,
    previous: bool,
}

impl Drop for RestoreEnabled<'_> {
    fn drop(&mut self) {
        self.accountable.state.write().enabled = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionGuard;

    fn resolver() -> (Arc<SessionGuard>, Accountable) {
        let guard = Arc::new(SessionGuard::new());
        let accountable = Accountable::new(AccountableConfig::default(), guard.clone());
        (guard, accountable)
    }

    #[test]
    fn test_resolves_nothing_when_anonymous() {
        let (_, accountable) = resolver();
        assert!(accountable.current_actor().is_none());
        assert!(accountable.current_actor_id().is_none());
    }

    #[test]
    fn test_resolves_authenticated_user() {
        let (guard, accountable) = resolver();
        let alice = Actor::new("alice");
        guard.login(alice.clone());
        assert_eq!(accountable.current_actor_id(), alice.id);
    }

    #[test]
    fn test_impersonation_wins_until_reset() {
        let (guard, accountable) = resolver();
        let alice = Actor::new("alice");
        let bob = Actor::new("bob");
        guard.login(alice.clone());

        accountable.act_as(bob.clone());
        assert!(accountable.is_impersonating());
        assert_eq!(accountable.current_actor(), Some(bob));
        assert_eq!(guard.user(), Some(alice.clone()));

        accountable.reset();
        assert!(!accountable.is_impersonating());
        assert_eq!(accountable.current_actor(), Some(alice));
    }

    #[test]
    fn test_impersonation_without_login() {
        let accountable = Accountable::guest(AccountableConfig::default());
        let bob = Actor::new("bob");
        accountable.act_as(bob.clone());
        assert_eq!(accountable.current_actor(), Some(bob));
        accountable.reset();
        assert!(accountable.current_actor().is_none());
    }

    #[test]
    fn test_enable_disable() {
        let (_, accountable) = resolver();
        assert!(accountable.is_enabled());
        accountable.disable();
        assert!(!accountable.is_enabled());
        accountable.enable();
        assert!(accountable.is_enabled());
    }

    #[test]
    fn test_without_stamping_restores_flag() {
        let (_, accountable) = resolver();
        let inside = accountable.without_stamping(|| accountable.is_enabled());
        assert!(!inside);
        assert!(accountable.is_enabled());

        accountable.disable();
        accountable.without_stamping(|| ());
        assert!(!accountable.is_enabled());
    }

    #[test]
    fn test_anonymous_fallback() {
        let (_, accountable) = resolver();
        assert!(accountable.anonymous_user().is_none());

        accountable.set_anonymous_user(AnonymousUser::named("Birmingham Bertie"));
        let fallback = accountable.anonymous_user().unwrap();
        assert_eq!(fallback.name, "Birmingham Bertie");
        assert!(!fallback.exists());

        accountable.clear_anonymous_user();
        assert!(accountable.anonymous_user_attributes().is_none());
    }

    #[test]
    fn test_fork_starts_from_config() {
        let (guard, accountable) = resolver();
        let alice = Actor::new("alice");
        guard.login(alice.clone());
        accountable.act_as(Actor::new("bob"));
        accountable.disable();

        let fresh = accountable.fork();
        assert!(fresh.is_enabled());
        assert!(!fresh.is_impersonating());
        assert_eq!(fresh.current_actor(), Some(alice));
    }

    #[test]
    fn test_config_seeds_state() {
        let config = AccountableConfig::new()
            .with_enabled(false)
            .with_anonymous_user(AnonymousUser::named("Guest"));
        let accountable = Accountable::guest(config);
        assert!(!accountable.is_enabled());
        assert_eq!(accountable.anonymous_user().map(|a| a.name), Some("Guest".to_string()));
    }
}
