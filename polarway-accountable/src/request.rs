//! Request scope — bind one resolver to one async task
//!
//! Each request handler runs inside [`with_accountable`] with its own
//! [`Accountable`]; code deeper in the call stack picks it up with
//! [`current`] instead of reaching for a process-wide singleton.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use polarway_accountable::{request, Accountable, AccountableConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let base = Accountable::guest(AccountableConfig::default());
//!
//!     let per_request = Arc::new(base.fork());
//!     request::with_accountable(per_request, async {
//!         let accountable = request::current().expect("bound by with_accountable");
//!         assert!(accountable.is_enabled());
//!     })
//!     .await;
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::resolver::Accountable;

tokio::task_local! {
    static CURRENT: Arc<Accountable>;
}

/// Run `fut` with `accountable` as the task's resolver
pub async fn with_accountable<F>(accountable: Arc<Accountable>, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT.scope(accountable, fut).await
}

/// Synchronous variant of [`with_accountable`]
pub fn with_accountable_sync<T>(accountable: Arc<Accountable>, f: impl FnOnce() -> T) -> T {
    CURRENT.sync_scope(accountable, f)
}

/// The resolver bound to the current task, if any
pub fn current() -> Option<Arc<Accountable>> {
    CURRENT.try_with(Arc::clone).ok()
}
