// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Local bearer-token expiry validation.
//!
//! The access token is an opaque signed structure; the only claim this crate
//! trusts is `exp`. Signature verification is the identity provider's business,
//! so decoding skips it entirely and reads the claims segment only.
//!
//! ## Fail-closed
//!
//! A token that cannot be decoded is treated as **expired**, never as valid.

use chrono::Utc;
use serde::Deserialize;

/// Claims read from the access token. Everything but `exp` is ignored.
#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    /// Expiration timestamp (Unix seconds)
    #[serde(default)]
    exp: i64,
}

/// Decode the token's `exp` claim without verifying the signature.
///
/// Returns `None` for any malformed token.
fn decode_exp(token: &str) -> Option<i64> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<ExpiryClaims>(token).ok()?;
    Some(token_data.claims.exp)
}

/// Check whether a bearer token is expired.
///
/// Compares the `exp` claim against wall-clock seconds. Malformed tokens and
/// tokens without a usable `exp` claim count as expired.
pub fn is_expired(token: &str) -> bool {
    match decode_exp(token) {
        Some(exp) => exp <= Utc::now().timestamp(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    /// Build an unsigned token with the given expiry
    /// (header.claims.signature, each segment base64url).
    pub(crate) fn token_with_exp(exp: i64) -> String {
        let header = r#"{"alg":"HS256","typ":"JWT"}"#;
        let claims = format!(r#"{{"sub":"jdoe","exp":{exp}}}"#);

        let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.as_bytes());

        format!("{header_b64}.{claims_b64}.fake_signature")
    }

    #[test]
    fn future_exp_is_not_expired() {
        let token = token_with_exp(Utc::now().timestamp() + 3600);
        assert!(!is_expired(&token));
    }

    #[test]
    fn past_exp_is_expired() {
        let token = token_with_exp(Utc::now().timestamp() - 3600);
        assert!(is_expired(&token));
    }

    #[test]
    fn missing_exp_is_expired() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(br#"{"sub":"jdoe"}"#);
        let token = format!("{header}.{claims}.sig");
        assert!(is_expired(&token));
    }

    #[test]
    fn malformed_token_is_expired() {
        assert!(is_expired(""));
        assert!(is_expired("not-a-token"));
        assert!(is_expired("a.b"));
        assert!(is_expired("!!!.###.$$$"));
    }

    #[test]
    fn garbage_payload_segment_is_expired() {
        // Valid header, payload that is not valid JSON once decoded.
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(b"this is not json");
        let token = format!("{header}.{claims}.sig");
        assert!(is_expired(&token));
    }
}
