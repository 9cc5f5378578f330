//! Creator query scopes for stampable records
//!
//! ```rust,ignore
//! use polarway_accountable::AccountableScopes;
//!
//! let alices = posts.get(&posts.query().only_created_by(&alice));
//! let mine = posts.get(&posts.query().mine(&accountable));
//! ```

use tracing::debug;

use crate::auth::Actor;
use crate::resolver::Accountable;
use crate::stamper::Stampable;
use crate::store::{Condition, Query};

/// Creator filters on [`Query`]
pub trait AccountableScopes: Sized {
    /// Records created by `actor`; a transient actor matches nothing
    fn only_created_by(self, actor: &Actor) -> Self;

    /// Records created by the currently resolved actor
    ///
    /// Matches no rows when nobody is resolved. It never widens to "all
    /// records" or to records with a null creator.
    fn mine(self, accountable: &Accountable) -> Self;
}

impl<R: Stampable> AccountableScopes for Query<R> {
    fn only_created_by(self, actor: &Actor) -> Self {
        match actor.id {
            Some(id) => self.where_eq(R::CREATED_BY_COLUMN, id),
            None => {
                debug!(table = R::TABLE, "Creator scope on transient actor matches nothing");
                self.filter(Condition::Nothing)
            }
        }
    }

    fn mine(self, accountable: &Accountable) -> Self {
        match accountable.current_actor() {
            Some(actor) => self.only_created_by(&actor),
            None => {
                debug!(table = R::TABLE, "No resolved actor, mine() matches nothing");
                self.filter(Condition::Nothing)
            }
        }
    }
}
