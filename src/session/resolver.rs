// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Tiered resolution of the linked correspondent id.
//!
//! Lightweight responses (login) often omit the correspondent link that
//! heavier ones (full profile fetch) carry, so resolution walks a fallback
//! chain from cheapest to most complete, short-circuiting at the first hit:
//!
//! 1. the live principal;
//! 2. the durable principal snapshot;
//! 3. a remote profile refetch — the one opportunistic cache refresh a
//!    resolution step is allowed: on success the refetched principal also
//!    becomes the live one.
//!
//! When the refetch still lacks the id, no further search is attempted.
//! `None` is a normal outcome ("feature unavailable for this principal"),
//! never an error; remote failures inside tier 3 are absorbed.

use tracing::debug;

use super::SessionManager;

/// Short-circuiting correspondent-id lookup over the session's state.
///
/// Only ever constructed by [`SessionManager`]; the tiers are sequential to
/// preserve the short-circuit contract.
pub(crate) struct IdentityResolver<'s> {
    session: &'s SessionManager,
}

impl<'s> IdentityResolver<'s> {
    pub(crate) fn new(session: &'s SessionManager) -> Self {
        Self { session }
    }

    pub(crate) async fn resolve(&self) -> Option<u64> {
        if let Some(id) = self.from_live_principal() {
            debug!(correspondent_id = id, "Correspondent id from live principal");
            return Some(id);
        }

        if let Some(id) = self.from_snapshot() {
            debug!(correspondent_id = id, "Correspondent id from stored snapshot");
            return Some(id);
        }

        match self.from_refetch().await {
            Some(id) => {
                debug!(correspondent_id = id, "Correspondent id from profile refetch");
                Some(id)
            }
            None => {
                debug!("Correspondent id unresolved after all tiers");
                None
            }
        }
    }

    fn from_live_principal(&self) -> Option<u64> {
        self.session
            .current_principal()
            .and_then(|p| p.linked_entity)
            .map(|entity| entity.id)
    }

    fn from_snapshot(&self) -> Option<u64> {
        self.session
            .snapshot_principal()
            .and_then(|p| p.linked_entity)
            .map(|entity| entity.id)
    }

    async fn from_refetch(&self) -> Option<u64> {
        match self.session.fetch_current_principal().await {
            Ok(principal) => principal.linked_entity.map(|entity| entity.id),
            Err(e) => {
                debug!(error = %e, "Profile refetch failed during id resolution");
                None
            }
        }
    }
}
