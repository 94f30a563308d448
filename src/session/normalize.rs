// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Reconciliation of inconsistent remote principal payloads.
//!
//! The authentication backend spells the same fields differently depending on
//! the endpoint and deployment age (`displayName` vs `nomeCompleto`, `roles`
//! vs `authorities`, nested correspondent object vs bare id). Every payload
//! that enters the session layer passes through [`normalize`], which is the
//! single place where that chaos is resolved.
//!
//! `normalize` is pure and idempotent: feeding a serialized [`Principal`]
//! back in yields the same principal.

use serde_json::Value;

use crate::principal::{EntityRef, Principal, PrincipalType, ROLE_CORRESPONDENTE};

/// Read a string field from the payload.
fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Read a numeric id that may arrive as a JSON number or a numeric string.
fn id_field(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Collapse a role-bearing field into an ordered claim list.
///
/// Anything that is not an array yields an empty list; non-string entries are
/// skipped. Insertion order is preserved (index 0 stays the primary role).
fn role_claims(raw: &Value) -> Vec<String> {
    ["roleClaims", "roles", "authorities"]
        .iter()
        .find_map(|key| raw.get(*key))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve the linked correspondent reference.
///
/// Prefers a nested `{id}` object; when only a bare id key is present, a
/// minimal reference is synthesized from it.
fn linked_entity(raw: &Value) -> Option<EntityRef> {
    for key in ["linkedEntity", "correspondente"] {
        if let Some(id) = raw.get(key).and_then(|nested| nested.get("id")) {
            if let Some(id) = id_field(id) {
                return Some(EntityRef { id });
            }
        }
    }

    for key in ["correspondenteId", "idCorrespondente"] {
        if let Some(id) = raw.get(key).and_then(id_field) {
            return Some(EntityRef { id });
        }
    }

    None
}

/// Normalize a raw remote payload into the canonical [`Principal`].
///
/// Applied in order:
/// 1. alternate field spellings map onto canonical fields only when the
///    canonical field is absent;
/// 2. a missing display name falls back to the login handle;
/// 3. role-bearing fields collapse into `role_claims`;
/// 4. correspondent-type principals missing `ROLE_CORRESPONDENTE` get it
///    appended (append keeps the primary role at index 0);
/// 5. a bare correspondent id synthesizes a minimal linked-entity reference.
pub fn normalize(raw: &Value) -> Principal {
    let id = raw.get("id").and_then(id_field).unwrap_or(0);
    let login = string_field(raw, "login").unwrap_or_default();

    let display_name = string_field(raw, "displayName")
        .or_else(|| string_field(raw, "nomeCompleto"))
        .unwrap_or_else(|| login.clone());

    let primary_email =
        string_field(raw, "primaryEmail").or_else(|| string_field(raw, "emailPrincipal"));

    let principal_type = string_field(raw, "principalType")
        .as_deref()
        .and_then(PrincipalType::from_str)
        .unwrap_or_default();

    let mut claims = role_claims(raw);
    if principal_type == PrincipalType::Correspondent
        && !claims.iter().any(|claim| claim == ROLE_CORRESPONDENTE)
    {
        claims.push(ROLE_CORRESPONDENTE.to_string());
    }

    let active = raw
        .get("active")
        .or_else(|| raw.get("ativo"))
        .and_then(Value::as_bool)
        .unwrap_or(true);

    Principal {
        id,
        login,
        display_name,
        primary_email,
        principal_type,
        role_claims: claims,
        linked_entity: linked_entity(raw),
        active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::{ROLE_ADMIN, ROLE_ADVOGADO};
    use serde_json::json;

    #[test]
    fn canonical_fields_pass_through() {
        let raw = json!({
            "id": 42,
            "login": "jdoe",
            "displayName": "John Doe",
            "primaryEmail": "jdoe@example.com",
            "principalType": "LAWYER",
            "roleClaims": [ROLE_ADVOGADO],
            "active": true,
        });

        let principal = normalize(&raw);
        assert_eq!(principal.id, 42);
        assert_eq!(principal.login, "jdoe");
        assert_eq!(principal.display_name, "John Doe");
        assert_eq!(principal.primary_email.as_deref(), Some("jdoe@example.com"));
        assert_eq!(principal.principal_type, PrincipalType::Lawyer);
        assert_eq!(principal.role_claims, vec![ROLE_ADVOGADO]);
        assert!(principal.active);
    }

    #[test]
    fn alternate_spellings_fill_absent_canonical_fields() {
        let raw = json!({
            "id": 7,
            "login": "maria",
            "nomeCompleto": "Maria Silva",
            "emailPrincipal": "maria@example.com",
            "roles": [ROLE_ADVOGADO],
        });

        let principal = normalize(&raw);
        assert_eq!(principal.display_name, "Maria Silva");
        assert_eq!(
            principal.primary_email.as_deref(),
            Some("maria@example.com")
        );
    }

    #[test]
    fn canonical_spelling_wins_over_alternate() {
        let raw = json!({
            "id": 7,
            "login": "maria",
            "displayName": "Maria S.",
            "nomeCompleto": "Maria Silva",
        });

        assert_eq!(normalize(&raw).display_name, "Maria S.");
    }

    #[test]
    fn display_name_falls_back_to_login() {
        let raw = json!({ "id": 1, "login": "jdoe" });
        assert_eq!(normalize(&raw).display_name, "jdoe");
    }

    #[test]
    fn authorities_collapse_into_role_claims() {
        let raw = json!({
            "id": 1,
            "login": "jdoe",
            "authorities": [ROLE_ADVOGADO, ROLE_ADMIN],
        });

        assert_eq!(normalize(&raw).role_claims, vec![ROLE_ADVOGADO, ROLE_ADMIN]);
    }

    #[test]
    fn non_array_roles_are_treated_as_empty() {
        let raw = json!({ "id": 1, "login": "jdoe", "roles": "ROLE_ADMIN" });
        assert!(normalize(&raw).role_claims.is_empty());
    }

    #[test]
    fn correspondent_with_empty_roles_gets_invariant_claim() {
        // Scenario: correspondent account whose login response carried no roles.
        let raw = json!({
            "id": 9,
            "login": "corr",
            "principalType": "CORRESPONDENT",
            "roles": [],
        });

        assert_eq!(normalize(&raw).role_claims, vec![ROLE_CORRESPONDENTE]);
    }

    #[test]
    fn invariant_repair_appends_without_reordering() {
        let raw = json!({
            "id": 9,
            "login": "corr",
            "principalType": "CORRESPONDENTE",
            "roles": [ROLE_ADVOGADO],
        });

        let principal = normalize(&raw);
        assert_eq!(principal.primary_role(), Some(ROLE_ADVOGADO));
        assert_eq!(
            principal.role_claims,
            vec![ROLE_ADVOGADO, ROLE_CORRESPONDENTE]
        );
    }

    #[test]
    fn bare_correspondent_id_synthesizes_reference() {
        for key in ["correspondenteId", "idCorrespondente"] {
            let raw = json!({ "id": 9, "login": "corr", key: 314 });
            assert_eq!(normalize(&raw).linked_entity, Some(EntityRef { id: 314 }));
        }
    }

    #[test]
    fn nested_reference_wins_over_bare_id() {
        let raw = json!({
            "id": 9,
            "login": "corr",
            "correspondente": { "id": 1, "nome": "Agency" },
            "correspondenteId": 2,
        });

        assert_eq!(normalize(&raw).linked_entity, Some(EntityRef { id: 1 }));
    }

    #[test]
    fn string_ids_are_accepted() {
        let raw = json!({ "id": "42", "login": "jdoe", "correspondenteId": "99" });
        let principal = normalize(&raw);
        assert_eq!(principal.id, 42);
        assert_eq!(principal.linked_entity, Some(EntityRef { id: 99 }));
    }

    #[test]
    fn active_defaults_to_true_and_reads_ativo() {
        let raw = json!({ "id": 1, "login": "jdoe" });
        assert!(normalize(&raw).active);

        let raw = json!({ "id": 1, "login": "jdoe", "ativo": false });
        assert!(!normalize(&raw).active);
    }

    #[test]
    fn normalize_is_idempotent() {
        let payloads = [
            json!({
                "id": 9,
                "login": "corr",
                "nomeCompleto": "Carlos Souza",
                "principalType": "CORRESPONDENTE",
                "roles": [],
                "correspondenteId": 55,
            }),
            json!({ "id": 1, "login": "jdoe" }),
            json!({
                "id": "3",
                "login": "ana",
                "emailPrincipal": "ana@example.com",
                "authorities": [ROLE_ADMIN],
                "principalType": "ADMIN",
            }),
        ];

        for raw in payloads {
            let once = normalize(&raw);
            let twice = normalize(&serde_json::to_value(&once).unwrap());
            assert_eq!(once, twice);
        }
    }
}
