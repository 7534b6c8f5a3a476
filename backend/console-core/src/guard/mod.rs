//! Navigation guard.
//!
//! [`evaluate`] is the whole decision: a pure function over a route and a
//! credential snapshot. [`NavigationGuard`] is the hook around it that reads
//! the store, emits the user-visible notice and resolves paths.

pub mod notifier;

pub use notifier::{LogNotifier, Notifier};

use crate::credential_store::{CredentialSnapshot, CredentialStore};
use crate::routes::{LOGIN_ROUTE_NAME, RouteDescriptor, RouteTable};
use crate::session::resolve_durable;

use log::{debug, info, warn};

/// Notice shown when a protected route is requested without a session.
///
/// "Never logged in" and "expired" look the same from here.
pub const NOT_LOGGED_IN_NOTICE: &str = "User not logged in or session expired!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    NotAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect {
        to: &'static str,
        reason: RedirectReason,
    },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Decide whether `target` may be entered with `snapshot`.
///
/// Routes without `requires_auth` and the login route always pass. Otherwise
/// either the cookie pair or the durable flag is enough.
pub fn evaluate(target: &RouteDescriptor, snapshot: &CredentialSnapshot) -> GuardDecision {
    if !target.requires_auth || target.is_login() {
        return GuardDecision::Allow;
    }

    if resolve_durable(snapshot).is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect {
            to: LOGIN_ROUTE_NAME,
            reason: RedirectReason::NotAuthenticated,
        }
    }
}

/// Result of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome<'a> {
    Proceed(&'a RouteDescriptor),
    Redirected {
        requested: &'a RouteDescriptor,
        to: &'a RouteDescriptor,
        reason: RedirectReason,
    },
    NotFound(String),
}

pub struct NavigationGuard<'a, N: Notifier> {
    routes: &'a RouteTable,
    store: CredentialStore,
    notifier: N,
}

impl<'a, N: Notifier> NavigationGuard<'a, N> {
    pub fn new(routes: &'a RouteTable, store: CredentialStore, notifier: N) -> Self {
        Self {
            routes,
            store,
            notifier,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Runs before every transition.
    ///
    /// Storage read failures are treated as "nothing stored", so a broken
    /// store redirects rather than admits.
    pub fn before_each(
        &self,
        to: &RouteDescriptor,
        from: Option<&RouteDescriptor>,
    ) -> GuardDecision {
        debug!(
            "Guard: {} -> {}",
            from.map_or("<start>", |route| route.path),
            to.path
        );

        let snapshot = if to.requires_auth && !to.is_login() {
            self.store.snapshot().unwrap_or_else(|e| {
                warn!("Credential store unreadable, treating as logged out: {e}");
                CredentialSnapshot::default()
            })
        } else {
            CredentialSnapshot::default()
        };

        let decision = evaluate(to, &snapshot);

        if let GuardDecision::Redirect { to: target, .. } = decision {
            info!("Guard redirected {} to {}", to.path, target);
            self.notifier.error(NOT_LOGGED_IN_NOTICE);
        }

        decision
    }

    /// Resolve `path` in the route table and run the guard on it.
    pub fn navigate(&self, path: &str, from: Option<&RouteDescriptor>) -> NavigationOutcome<'a> {
        let routes = self.routes;

        let Some(target) = routes.resolve(path) else {
            warn!("No route for {path}");
            return NavigationOutcome::NotFound(path.to_string());
        };

        match self.before_each(target, from) {
            GuardDecision::Allow => NavigationOutcome::Proceed(target),
            GuardDecision::Redirect { to, reason } => match routes.by_name(to) {
                Some(login) => NavigationOutcome::Redirected {
                    requested: target,
                    to: login,
                    reason,
                },
                None => NavigationOutcome::NotFound(to.to_string()),
            },
        }
    }
}
