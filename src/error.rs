// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Session-layer error taxonomy.
//!
//! Recoverable, expected conditions never appear here: an expired token folds
//! into `is_authenticated() == false`, a corrupt snapshot is treated as
//! absent, and an unresolved correspondent id is a normal `None`. What remains
//! is the set of failures a caller can actually act on.

use crate::backend::BackendError;

/// Errors surfaced by [`SessionManager`](crate::session::SessionManager)
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Login was rejected by the authentication backend (bad login/password).
    /// No local state is mutated.
    #[error("credentials were rejected by the authentication service")]
    CredentialInvalid,

    /// A refresh was requested while no refresh token is stored.
    #[error("no refresh token is stored for this session")]
    NoRefreshToken,

    /// A guarded remote call answered 401. The session has already been torn
    /// down by the time this propagates.
    #[error("session is not authorized")]
    Unauthorized,

    /// Transport-level failure. No retry at this layer.
    #[error("authentication service is unreachable: {0}")]
    Network(String),

    /// The backend answered with a body this crate cannot interpret.
    #[error("authentication service response was invalid: {0}")]
    InvalidResponse(String),
}

impl From<BackendError> for SessionError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::CredentialsRejected => SessionError::CredentialInvalid,
            BackendError::Unauthorized => SessionError::Unauthorized,
            BackendError::Request(msg) => SessionError::Network(msg),
            BackendError::InvalidResponse(msg) => SessionError::InvalidResponse(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            SessionError::from(BackendError::CredentialsRejected),
            SessionError::CredentialInvalid
        ));
        assert!(matches!(
            SessionError::from(BackendError::Unauthorized),
            SessionError::Unauthorized
        ));
        assert!(matches!(
            SessionError::from(BackendError::Request("timeout".into())),
            SessionError::Network(_)
        ));
        assert!(matches!(
            SessionError::from(BackendError::InvalidResponse("bad".into())),
            SessionError::InvalidResponse(_)
        ));
    }
}
