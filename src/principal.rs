// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! The canonical signed-in identity and its role vocabulary.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role claim granted to administrators.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Role claim granted to lawyer accounts (the platform's base account type).
pub const ROLE_ADVOGADO: &str = "ROLE_ADVOGADO";
/// Role claim granted to correspondent accounts.
pub const ROLE_CORRESPONDENTE: &str = "ROLE_CORRESPONDENTE";

/// Coarse business role of a principal.
///
/// ## Account Types
///
/// - `Admin` - Platform staff with full access
/// - `Lawyer` - Contracting lawyer (base account type)
/// - `Correspondent` - Contracted field agent linked to a correspondent record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrincipalType {
    /// Full administrative access
    Admin,
    /// Contracting lawyer (owns service requests)
    Lawyer,
    /// Contracted correspondent (fulfils service requests)
    Correspondent,
}

impl PrincipalType {
    /// Parse a principal type from string (case-insensitive).
    ///
    /// The remote API is not consistent about the spelling: older endpoints
    /// answer with the Portuguese account-type names.
    pub fn from_str(s: &str) -> Option<PrincipalType> {
        match s.to_uppercase().as_str() {
            "ADMIN" | "ADMINISTRADOR" => Some(PrincipalType::Admin),
            "LAWYER" | "ADVOGADO" => Some(PrincipalType::Lawyer),
            "CORRESPONDENT" | "CORRESPONDENTE" => Some(PrincipalType::Correspondent),
            _ => None,
        }
    }
}

impl Default for PrincipalType {
    /// Default type is Lawyer (the least-privileged full account).
    fn default() -> Self {
        PrincipalType::Lawyer
    }
}

impl std::fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrincipalType::Admin => write!(f, "ADMIN"),
            PrincipalType::Lawyer => write!(f, "LAWYER"),
            PrincipalType::Correspondent => write!(f, "CORRESPONDENT"),
        }
    }
}

/// Weak reference to a correspondent business entity.
///
/// Lookup key only; the session layer never owns the record behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    /// Correspondent record id
    pub id: u64,
}

/// The canonical signed-in identity used for all authorization decisions.
///
/// Field names serialize in camelCase so that the durable `principalSnapshot`
/// round-trips through the normalizer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Opaque numeric identifier assigned by the remote backend
    pub id: u64,

    /// Unique handle
    pub login: String,

    /// Human name; falls back to `login` when the backend omits it
    pub display_name: String,

    /// Primary e-mail address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,

    /// Coarse business role
    pub principal_type: PrincipalType,

    /// Ordered role claims; index 0 is the primary role for display purposes
    pub role_claims: Vec<String>,

    /// Linked correspondent record, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_entity: Option<EntityRef>,

    /// Whether the account is active
    pub active: bool,
}

impl Principal {
    /// The primary role claim (index 0), when any claim is present.
    pub fn primary_role(&self) -> Option<&str> {
        self.role_claims.first().map(String::as_str)
    }

    /// Check whether the principal carries the given role claim.
    pub fn has_role(&self, role: &str) -> bool {
        self.role_claims.iter().any(|r| r == role)
    }

    /// Check whether this principal is a correspondent-type account.
    pub fn is_correspondent(&self) -> bool {
        self.principal_type == PrincipalType::Correspondent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_principal() -> Principal {
        Principal {
            id: 42,
            login: "jdoe".to_string(),
            display_name: "John Doe".to_string(),
            primary_email: Some("jdoe@example.com".to_string()),
            principal_type: PrincipalType::Lawyer,
            role_claims: vec![ROLE_ADVOGADO.to_string()],
            linked_entity: None,
            active: true,
        }
    }

    #[test]
    fn from_str_parses_both_spellings() {
        assert_eq!(PrincipalType::from_str("admin"), Some(PrincipalType::Admin));
        assert_eq!(
            PrincipalType::from_str("ADVOGADO"),
            Some(PrincipalType::Lawyer)
        );
        assert_eq!(
            PrincipalType::from_str("Lawyer"),
            Some(PrincipalType::Lawyer)
        );
        assert_eq!(
            PrincipalType::from_str("correspondente"),
            Some(PrincipalType::Correspondent)
        );
        assert_eq!(PrincipalType::from_str("unknown"), None);
    }

    #[test]
    fn default_type_is_lawyer() {
        assert_eq!(PrincipalType::default(), PrincipalType::Lawyer);
    }

    #[test]
    fn primary_role_is_index_zero() {
        let mut principal = sample_principal();
        principal.role_claims = vec![ROLE_ADVOGADO.to_string(), ROLE_ADMIN.to_string()];
        assert_eq!(principal.primary_role(), Some(ROLE_ADVOGADO));

        principal.role_claims.clear();
        assert_eq!(principal.primary_role(), None);
    }

    #[test]
    fn has_role_matches_exactly() {
        let principal = sample_principal();
        assert!(principal.has_role(ROLE_ADVOGADO));
        assert!(!principal.has_role(ROLE_ADMIN));
    }

    #[test]
    fn snapshot_roundtrip_uses_camel_case() {
        let principal = sample_principal();
        let json = serde_json::to_value(&principal).unwrap();
        assert!(json.get("displayName").is_some());
        assert!(json.get("principalType").is_some());
        assert!(json.get("roleClaims").is_some());

        let back: Principal = serde_json::from_value(json).unwrap();
        assert_eq!(back, principal);
    }
}
