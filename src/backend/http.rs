// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Reqwest implementation of the authentication backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::{AuthBackend, BackendError, LoginCredentials, LoginResponse, TokenPair};

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// HTTP client for the authentication backend.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    base_url: String,
    http: Client,
}

impl HttpAuthBackend {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a client from the `AUTH_BASE_URL` environment variable.
    pub fn from_env() -> Result<Self, BackendError> {
        let base_url = std::env::var(crate::config::AUTH_BASE_URL_ENV).map_err(|_| {
            BackendError::Request(format!(
                "{} is not configured",
                crate::config::AUTH_BASE_URL_ENV
            ))
        })?;
        Self::new(base_url)
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Extract the token pair from a login/refresh response body.
///
/// The backend answers with `token` + `refreshToken` at the top level.
fn parse_token_pair(body: &Value) -> Result<TokenPair, BackendError> {
    let access_token = body
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| BackendError::InvalidResponse("missing token in response".to_string()))?
        .to_string();

    let refresh_token = body
        .get("refreshToken")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            BackendError::InvalidResponse("missing refreshToken in response".to_string())
        })?
        .to_string();

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Map a non-success status on a bearer-guarded endpoint.
fn guarded_status_error(status: StatusCode) -> BackendError {
    if status == StatusCode::UNAUTHORIZED {
        BackendError::Unauthorized
    } else {
        BackendError::Request(format!("HTTP {status} from authentication service"))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, BackendError> {
        let response = self
            .http
            .post(self.endpoint("/login"))
            .json(&json!({ "login": credentials.login, "senha": credentials.senha }))
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::CredentialsRejected);
        }
        if !status.is_success() {
            return Err(BackendError::Request(format!(
                "HTTP {status} from login endpoint"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let tokens = parse_token_pair(&body)?;
        Ok(LoginResponse {
            tokens,
            principal: body,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, BackendError> {
        let response = self
            .http
            .post(self.endpoint("/refresh"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(guarded_status_error(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        parse_token_pair(&body)
    }

    async fn fetch_me(&self, access_token: &str) -> Result<Value, BackendError> {
        let response = self
            .http
            .get(self.endpoint("/me"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(guarded_status_error(status));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn validate(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .http
            .get(self.endpoint("/validate"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(guarded_status_error(status));
        }

        Ok(())
    }
}
