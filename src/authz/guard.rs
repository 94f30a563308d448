// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Route guards: the four concrete policy invocations protecting navigation.
//!
//! Every guard reads the session through [`SessionManager`]'s query surface,
//! delegates the decision to [`policy`](super::policy) and performs the
//! navigation side effect on deny. The boolean outcome goes back to the
//! framework caller; a guard never leaves it in an ambiguous pending state.

use std::sync::Arc;

use tracing::debug;

use super::policy::{self, AuthorizationDecision};
use crate::nav::{Navigation, Navigator};
use crate::principal::{Principal, ROLE_ADMIN, ROLE_CORRESPONDENTE};
use crate::session::SessionManager;

/// The route being navigated to, plus its role metadata when it carries any.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    /// URL of the protected route (preserved as the post-login return URL)
    pub url: String,
    /// Required roles declared on the route, when declared at all
    pub required_roles: Option<Vec<String>>,
}

impl RouteContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            required_roles: None,
        }
    }

    /// Attach role metadata to the route.
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.required_roles = Some(roles);
        self
    }
}

/// The authenticated principal for guard evaluation: `None` whenever the
/// session is unauthenticated, expired token included.
fn guard_principal(session: &SessionManager) -> Option<Principal> {
    if session.is_authenticated() {
        session.current_principal()
    } else {
        None
    }
}

/// Apply a decision: navigate on deny, report the boolean outcome.
fn apply(decision: AuthorizationDecision, navigator: &dyn Navigator, route: &RouteContext) -> bool {
    match decision {
        AuthorizationDecision::Allow => true,
        AuthorizationDecision::Deny { target, return_url } => {
            debug!(url = %route.url, ?target, "Route denied");
            navigator.navigate(match target {
                policy::RedirectTarget::Login => Navigation::Login { return_url },
                policy::RedirectTarget::Unauthorized => Navigation::Unauthorized,
            });
            false
        }
    }
}

/// Gate for routes that only require a signed-in principal.
pub struct AuthenticatedGuard {
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
}

impl AuthenticatedGuard {
    pub fn new(session: Arc<SessionManager>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn check(&self, route: &RouteContext) -> bool {
        let principal = guard_principal(&self.session);
        let decision = policy::decide(principal.as_ref(), &[], &route.url);
        apply(decision, self.navigator.as_ref(), route)
    }
}

/// Gate for admin-only routes.
///
/// Unauthenticated callers are sent to login before the admin check runs, so
/// a signed-out visit to an admin screen never lands on "unauthorized".
pub struct AdminGuard {
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
}

impl AdminGuard {
    pub fn new(session: Arc<SessionManager>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn check(&self, route: &RouteContext) -> bool {
        let principal = guard_principal(&self.session);
        let decision = policy::decide(principal.as_ref(), &[ROLE_ADMIN], &route.url);
        apply(decision, self.navigator.as_ref(), route)
    }
}

/// Gate driven by the route's own role metadata.
///
/// Routes that declare no roles behave as authenticated-only.
pub struct RoleSetGuard {
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
}

impl RoleSetGuard {
    pub fn new(session: Arc<SessionManager>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn check(&self, route: &RouteContext) -> bool {
        let principal = guard_principal(&self.session);
        let roles = route.required_roles.clone().unwrap_or_default();
        let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
        let decision = policy::decide(principal.as_ref(), &roles, &route.url);
        apply(decision, self.navigator.as_ref(), route)
    }
}

/// Gate for the correspondent area.
///
/// Accepts either the correspondent role claim or a correspondent-type
/// principal whose claim has not been repaired yet.
pub struct CorrespondentGuard {
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
}

impl CorrespondentGuard {
    pub fn new(session: Arc<SessionManager>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn check(&self, route: &RouteContext) -> bool {
        let principal = guard_principal(&self.session);

        let decision = match policy::decide(principal.as_ref(), &[ROLE_CORRESPONDENTE], &route.url)
        {
            AuthorizationDecision::Deny {
                target: policy::RedirectTarget::Unauthorized,
                ..
            } if principal
                .as_ref()
                .map(Principal::is_correspondent)
                .unwrap_or(false) =>
            {
                AuthorizationDecision::Allow
            }
            decision => decision,
        };

        apply(decision, self.navigator.as_ref(), route)
    }
}
