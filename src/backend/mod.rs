// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! # Remote Collaborators
//!
//! The session core consumes two external services through narrow traits:
//! the authentication backend (login, refresh, current principal, validate)
//! and the correspondent lookup backend. Both are black boxes; the only
//! contract this crate relies on is the shape of their responses and the
//! convention that an unauthorized request is detectable as a 401.
//!
//! Traits are object-safe so the session layer can hold `Arc<dyn AuthBackend>`
//! and tests can substitute doubles.

pub mod correspondent;
pub mod http;

pub use correspondent::{Correspondent, CorrespondentClient};
pub use http::HttpAuthBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Login form posted to the authentication backend.
///
/// `senha` is the wire name the backend expects for the password field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    /// Unique handle
    pub login: String,
    /// Password (wire name kept as the backend spells it)
    pub senha: String,
}

/// An access/refresh token pair issued by the authentication backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Bearer access token (signed, carries `exp`)
    pub access_token: String,
    /// Opaque refresh token
    pub refresh_token: String,
}

/// Successful login: the issued token pair plus the principal-ish fields the
/// backend returned alongside them (normalized later by the session layer).
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub tokens: TokenPair,
    pub principal: Value,
}

/// Errors produced by the remote collaborators.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The login endpoint rejected the submitted credentials.
    #[error("credentials rejected by the authentication service")]
    CredentialsRejected,

    /// A guarded request answered 401.
    #[error("request was not authorized")]
    Unauthorized,

    /// Transport failure (connect, timeout, non-auth HTTP error).
    #[error("request to the authentication service failed: {0}")]
    Request(String),

    /// The response body did not have the expected shape.
    #[error("authentication service response was invalid: {0}")]
    InvalidResponse(String),
}

/// The remote authentication backend.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange login/password for a token pair and a principal payload.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, BackendError>;

    /// Exchange a refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, BackendError>;

    /// Fetch the current principal payload for the bearer token.
    async fn fetch_me(&self, access_token: &str) -> Result<Value, BackendError>;

    /// Probe whether the bearer token is still accepted remotely.
    async fn validate(&self, access_token: &str) -> Result<(), BackendError>;
}

/// The correspondent business-entity lookup backend.
#[async_trait]
pub trait CorrespondentLookup: Send + Sync {
    /// Fetch a correspondent record by id.
    async fn fetch_correspondent(
        &self,
        access_token: &str,
        id: u64,
    ) -> Result<Correspondent, BackendError>;
}
