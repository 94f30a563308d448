// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Session endpoints: login, logout, refresh and the current principal.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::{LoginCredentials, TokenPair};
use crate::principal::{Principal, PrincipalType};
use crate::state::AppState;

use super::error::ApiError;

/// Principal as exposed over the API.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    pub id: u64,
    pub login: String,
    pub display_name: String,
    /// Primary role (first role claim)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_role: Option<String>,
    pub principal_type: PrincipalType,
    pub role_claims: Vec<String>,
    /// Linked correspondent id, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correspondent_id: Option<u64>,
    pub active: bool,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        Self {
            primary_role: principal.primary_role().map(str::to_string),
            correspondent_id: principal.linked_entity.map(|entity| entity.id),
            id: principal.id,
            login: principal.login,
            display_name: principal.display_name,
            principal_type: principal.principal_type,
            role_claims: principal.role_claims,
            active: principal.active,
        }
    }
}

/// Response for GET /v1/auth/session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStatusResponse {
    /// Whether a non-expired access token is stored
    pub authenticated: bool,
    /// The cached principal, when one is published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<PrincipalResponse>,
}

/// Sign in with login and password.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Session established", body = PrincipalResponse),
        (status = 401, description = "Credentials rejected"),
        (status = 502, description = "Authentication backend unavailable"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<PrincipalResponse>, ApiError> {
    let principal = state.session.login(&credentials).await?;
    Ok(Json(principal.into()))
}

/// Destroy the current session.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Session destroyed"),
    )
)]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout();
    StatusCode::NO_CONTENT
}

/// Exchange the stored refresh token for a new pair.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    tag = "Auth",
    responses(
        (status = 200, description = "New token pair issued", body = TokenPair),
        (status = 401, description = "No refresh token stored or exchange rejected"),
        (status = 502, description = "Authentication backend unavailable"),
    )
)]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<TokenPair>, ApiError> {
    let pair = state.session.refresh_token().await?;
    Ok(Json(pair))
}

/// Fetch the current principal from the authentication backend.
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current principal", body = PrincipalResponse),
        (status = 401, description = "Session is not authorized"),
        (status = 502, description = "Authentication backend unavailable"),
    )
)]
pub async fn me(State(state): State<AppState>) -> Result<Json<PrincipalResponse>, ApiError> {
    let principal = state.session.fetch_current_principal().await?;
    Ok(Json(principal.into()))
}

/// Confirm the stored access token is still accepted remotely.
#[utoipa::path(
    get,
    path = "/v1/auth/validate",
    tag = "Auth",
    responses(
        (status = 204, description = "Token is accepted"),
        (status = 401, description = "Session is not authorized"),
        (status = 502, description = "Authentication backend unavailable"),
    )
)]
pub async fn validate(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.session.validate_remote().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The cached session status, without touching the network.
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Session status", body = SessionStatusResponse),
    )
)]
pub async fn session_status(State(state): State<AppState>) -> Json<SessionStatusResponse> {
    let authenticated = state.session.is_authenticated();
    let principal = if authenticated {
        state.session.current_principal().map(PrincipalResponse::from)
    } else {
        None
    };

    Json(SessionStatusResponse {
        authenticated,
        principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::{EntityRef, ROLE_ADVOGADO, ROLE_CORRESPONDENTE};

    #[test]
    fn principal_response_from_principal() {
        let principal = Principal {
            id: 9,
            login: "corr".to_string(),
            display_name: "Carlos Souza".to_string(),
            primary_email: None,
            principal_type: PrincipalType::Correspondent,
            role_claims: vec![ROLE_ADVOGADO.to_string(), ROLE_CORRESPONDENTE.to_string()],
            linked_entity: Some(EntityRef { id: 55 }),
            active: true,
        };

        let response: PrincipalResponse = principal.into();
        assert_eq!(response.primary_role.as_deref(), Some(ROLE_ADVOGADO));
        assert_eq!(response.correspondent_id, Some(55));
        assert_eq!(response.principal_type, PrincipalType::Correspondent);
    }

    #[test]
    fn principal_response_without_roles_has_no_primary() {
        let principal = Principal {
            id: 1,
            login: "jdoe".to_string(),
            display_name: "jdoe".to_string(),
            primary_email: None,
            principal_type: PrincipalType::Lawyer,
            role_claims: vec![],
            linked_entity: None,
            active: true,
        };

        let response: PrincipalResponse = principal.into();
        assert_eq!(response.primary_role, None);
        assert_eq!(response.correspondent_id, None);
    }
}
