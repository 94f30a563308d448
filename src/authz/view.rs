// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Role-conditional visibility for UI fragments.
//!
//! A [`PermissionView`] tracks the principal stream and answers "should this
//! fragment render?" for a role list with any-of or all-of semantics. It
//! hides and shows; it never destroys state elsewhere.

use tokio::sync::watch;

use super::policy;
use crate::principal::Principal;

/// Visibility evaluator bound to the session's principal stream.
pub struct PermissionView {
    roles: Vec<String>,
    require_all: bool,
    rx: watch::Receiver<Option<Principal>>,
}

impl PermissionView {
    /// Create a view over a principal subscription.
    ///
    /// An empty role list means "always visible", signed-out included.
    pub fn new(
        rx: watch::Receiver<Option<Principal>>,
        roles: Vec<String>,
        require_all: bool,
    ) -> Self {
        Self {
            roles,
            require_all,
            rx,
        }
    }

    /// Replace the role list; the next [`visible`](Self::visible) call
    /// evaluates against the new input.
    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
    }

    /// Current visibility, recomputed from the latest published principal.
    pub fn visible(&self) -> bool {
        if self.roles.is_empty() {
            return true;
        }

        let principal = self.rx.borrow();
        let roles: Vec<&str> = self.roles.iter().map(String::as_str).collect();
        let decision = if self.require_all {
            policy::decide_all(principal.as_ref(), &roles, "")
        } else {
            policy::decide(principal.as_ref(), &roles, "")
        };
        decision.is_allowed()
    }

    /// Wait until the underlying principal changes, then let the caller
    /// re-read [`visible`](Self::visible).
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }
}
