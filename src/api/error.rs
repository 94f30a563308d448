// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::BackendError;
use crate::error::SessionError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::CredentialInvalid
            | SessionError::NoRefreshToken
            | SessionError::Unauthorized => Self::unauthorized(e.to_string()),
            SessionError::Network(_) | SessionError::InvalidResponse(_) => {
                Self::bad_gateway(e.to_string())
            }
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::CredentialsRejected | BackendError::Unauthorized => {
                Self::unauthorized(e.to_string())
            }
            BackendError::Request(_) | BackendError::InvalidResponse(_) => {
                Self::bad_gateway(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn session_errors_map_to_http_status() {
        assert_eq!(
            ApiError::from(SessionError::CredentialInvalid).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SessionError::NoRefreshToken).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SessionError::Network("down".into())).status,
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::unauthorized("no session").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"no session"}"#);
    }
}
