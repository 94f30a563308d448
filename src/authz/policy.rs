// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Pure authorization decisions.
//!
//! No state, no I/O: a principal (or its absence), a required-role set and
//! the current URL go in, a decision comes out. Callers pass `None` for the
//! principal whenever the session is unauthenticated, expired token included.

use serde::Serialize;

use crate::principal::Principal;

/// Where a denied caller is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectTarget {
    Login,
    Unauthorized,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AuthorizationDecision {
    /// Access granted.
    Allow,
    /// Access denied; the caller is redirected.
    Deny {
        target: RedirectTarget,
        /// Where the caller was headed, preserved for post-login return.
        return_url: Option<String>,
    },
}

impl AuthorizationDecision {
    fn deny_login(return_url: &str) -> Self {
        AuthorizationDecision::Deny {
            target: RedirectTarget::Login,
            return_url: Some(return_url.to_string()),
        }
    }

    fn deny_unauthorized() -> Self {
        AuthorizationDecision::Deny {
            target: RedirectTarget::Unauthorized,
            return_url: None,
        }
    }

    /// Whether the decision grants access.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow)
    }
}

/// Any-match authorization: the principal needs at least one required role.
///
/// - unauthenticated (`None`) ⇒ redirect to login with the return URL;
/// - empty requirement ⇒ allow (weakest requirement);
/// - role intersection ⇒ allow;
/// - otherwise ⇒ redirect to unauthorized.
pub fn decide(
    principal: Option<&Principal>,
    required_roles: &[&str],
    current_url: &str,
) -> AuthorizationDecision {
    let Some(principal) = principal else {
        return AuthorizationDecision::deny_login(current_url);
    };

    if required_roles.is_empty() {
        return AuthorizationDecision::Allow;
    }

    if required_roles.iter().any(|role| principal.has_role(role)) {
        AuthorizationDecision::Allow
    } else {
        AuthorizationDecision::deny_unauthorized()
    }
}

/// All-match authorization: every required role must be present.
pub fn decide_all(
    principal: Option<&Principal>,
    required_roles: &[&str],
    current_url: &str,
) -> AuthorizationDecision {
    let Some(principal) = principal else {
        return AuthorizationDecision::deny_login(current_url);
    };

    if required_roles.iter().all(|role| principal.has_role(role)) {
        AuthorizationDecision::Allow
    } else {
        AuthorizationDecision::deny_unauthorized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::{PrincipalType, ROLE_ADMIN, ROLE_ADVOGADO, ROLE_CORRESPONDENTE};

    fn lawyer() -> Principal {
        Principal {
            id: 1,
            login: "jdoe".to_string(),
            display_name: "John Doe".to_string(),
            primary_email: None,
            principal_type: PrincipalType::Lawyer,
            role_claims: vec![ROLE_ADVOGADO.to_string()],
            linked_entity: None,
            active: true,
        }
    }

    #[test]
    fn unauthenticated_redirects_to_login_with_return_url() {
        let decision = decide(None, &[ROLE_ADMIN], "/admin/users");
        assert_eq!(
            decision,
            AuthorizationDecision::Deny {
                target: RedirectTarget::Login,
                return_url: Some("/admin/users".to_string()),
            }
        );
    }

    #[test]
    fn empty_requirement_is_the_weakest() {
        let principal = lawyer();
        assert!(decide(Some(&principal), &[], "/home").is_allowed());

        // Monotonicity: anything allowed under some requirement is allowed
        // under the empty one.
        assert!(decide(Some(&principal), &[ROLE_ADVOGADO], "/home").is_allowed());
        assert!(decide(Some(&principal), &[], "/home").is_allowed());
    }

    #[test]
    fn any_match_allows() {
        let principal = lawyer();
        let decision = decide(
            Some(&principal),
            &[ROLE_ADMIN, ROLE_ADVOGADO],
            "/requests",
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn role_mismatch_redirects_to_unauthorized() {
        let principal = lawyer();
        let decision = decide(Some(&principal), &[ROLE_ADMIN], "/admin");
        assert_eq!(
            decision,
            AuthorizationDecision::Deny {
                target: RedirectTarget::Unauthorized,
                return_url: None,
            }
        );
    }

    #[test]
    fn decide_all_requires_every_role() {
        let mut principal = lawyer();
        principal.role_claims.push(ROLE_CORRESPONDENTE.to_string());

        assert!(decide_all(
            Some(&principal),
            &[ROLE_ADVOGADO, ROLE_CORRESPONDENTE],
            "/x"
        )
        .is_allowed());

        assert!(!decide_all(
            Some(&principal),
            &[ROLE_ADVOGADO, ROLE_ADMIN],
            "/x"
        )
        .is_allowed());
    }

    #[test]
    fn decide_all_with_empty_requirement_allows_authenticated() {
        let principal = lawyer();
        assert!(decide_all(Some(&principal), &[], "/x").is_allowed());
        assert!(!decide_all(None, &[], "/x").is_allowed());
    }
}
