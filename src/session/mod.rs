// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! # Session Module
//!
//! The session manager owns the relationship between the credential store and
//! the live principal: it is the sole writer of the store and the single
//! broadcaster of principal changes.
//!
//! ## Lifecycle
//!
//! - Created on successful login (tokens persisted, principal derived from
//!   the login response)
//! - Refreshed by exchanging the refresh token (principal untouched)
//! - Destroyed on explicit logout or on an observed 401 from a guarded
//!   remote call; storage and the in-memory principal are cleared together
//!
//! ## Concurrency
//!
//! Publication is synchronous with the write that caused it. The store mutex
//! is never held across an await. Concurrent `refresh_token` calls are not
//! mutually excluded: the last response to complete determines the stored
//! pair. Callers that need stricter coordination must serialize refreshes
//! themselves.

pub mod normalize;
pub mod resolver;
pub mod token;

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{AuthBackend, BackendError, LoginCredentials, TokenPair};
use crate::error::SessionError;
use crate::nav::{Navigation, Navigator, TracingNavigator};
use crate::principal::Principal;
use crate::store::{
    CredentialStore, ACCESS_TOKEN_KEY, PRINCIPAL_SNAPSHOT_KEY, REFRESH_TOKEN_KEY,
};

use self::resolver::IdentityResolver;

/// Orchestrator for login, logout, refresh and the published principal state.
///
/// Constructed once at process start; consumers hold a reference (usually an
/// `Arc`) and read through the query/subscribe surface, never independent
/// copies of the principal that could go stale without notification.
pub struct SessionManager {
    backend: Arc<dyn AuthBackend>,
    store: Mutex<Box<dyn CredentialStore>>,
    principal_tx: watch::Sender<Option<Principal>>,
    navigator: Arc<dyn Navigator>,
    session_id: Mutex<Option<Uuid>>,
}

impl SessionManager {
    /// Create a session manager over the given backend and store.
    ///
    /// When the store still holds a non-expired access token and a parseable
    /// principal snapshot, the snapshot is restored as the live principal so
    /// a restart does not sign the user out.
    pub fn new(backend: Arc<dyn AuthBackend>, store: Box<dyn CredentialStore>) -> Self {
        let restored = restore_principal(store.as_ref());
        let (principal_tx, _) = watch::channel(restored);

        Self {
            backend,
            store: Mutex::new(store),
            principal_tx,
            navigator: Arc::new(TracingNavigator),
            session_id: Mutex::new(None),
        }
    }

    /// Replace the navigation seam (default logs only).
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    fn store(&self) -> MutexGuard<'_, Box<dyn CredentialStore>> {
        self.store.lock().expect("credential store lock poisoned")
    }

    /// Subscribe to principal changes. The receiver always carries the
    /// latest published value.
    pub fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.principal_tx.subscribe()
    }

    /// The cached live principal, without touching the network.
    pub fn current_principal(&self) -> Option<Principal> {
        self.principal_tx.borrow().clone()
    }

    /// Whether a non-expired access token is stored.
    ///
    /// Derived on every read; an expired token is not an error, just `false`.
    pub fn is_authenticated(&self) -> bool {
        self.store()
            .get(ACCESS_TOKEN_KEY)
            .map(|token| !token::is_expired(&token))
            .unwrap_or(false)
    }

    /// The stored access token, for calling code that drives other guarded
    /// backends through the same bearer credential.
    pub fn access_token(&self) -> Option<String> {
        self.store().get(ACCESS_TOKEN_KEY)
    }

    /// Correlation id assigned at login, cleared on teardown. Shows up in the
    /// structured logs of everything this session does.
    pub fn session_id(&self) -> Option<Uuid> {
        *self.session_id.lock().expect("session id lock poisoned")
    }

    /// Exchange login/password for a session.
    ///
    /// On success both tokens and the principal snapshot are persisted and
    /// the new principal is published. On any error nothing is persisted and
    /// the error propagates unchanged (no retry).
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Principal, SessionError> {
        let response = self.backend.login(credentials).await.map_err(|e| {
            debug!(login = %credentials.login, error = %e, "Login rejected");
            SessionError::from(e)
        })?;

        let principal = normalize::normalize(&response.principal);

        {
            let mut store = self.store();
            store.put(ACCESS_TOKEN_KEY, &response.tokens.access_token);
            store.put(REFRESH_TOKEN_KEY, &response.tokens.refresh_token);
            store.put(PRINCIPAL_SNAPSHOT_KEY, &snapshot_json(&principal));
        }

        let session_id = Uuid::new_v4();
        *self.session_id.lock().expect("session id lock poisoned") = Some(session_id);
        info!(
            login = %principal.login,
            session_id = %session_id,
            "Session established"
        );

        self.publish(Some(principal.clone()));
        Ok(principal)
    }

    /// Destroy the session: clear the store, publish `None`, signal
    /// navigation to the login screen.
    pub fn logout(&self) {
        self.store().clear();
        *self.session_id.lock().expect("session id lock poisoned") = None;
        self.publish(None);
        info!("Session destroyed");
        self.navigator
            .navigate(Navigation::Login { return_url: None });
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// Fails immediately when no refresh token is stored; redirecting is the
    /// caller's responsibility, not this method's. The cached principal is
    /// never touched by a refresh.
    pub async fn refresh_token(&self) -> Result<TokenPair, SessionError> {
        let refresh_token = self
            .store()
            .get(REFRESH_TOKEN_KEY)
            .ok_or(SessionError::NoRefreshToken)?;

        let pair = self.backend.refresh(&refresh_token).await?;

        {
            let mut store = self.store();
            store.put(ACCESS_TOKEN_KEY, &pair.access_token);
            store.put(REFRESH_TOKEN_KEY, &pair.refresh_token);
        }

        debug!("Access token refreshed");
        Ok(pair)
    }

    /// Refresh the live principal from the remote profile endpoint.
    ///
    /// Normalizes the response, checks the correspondent link inline,
    /// persists the snapshot and publishes. An observed 401 tears the session
    /// down before the error propagates; navigation stays with the guards.
    pub async fn fetch_current_principal(&self) -> Result<Principal, SessionError> {
        let Some(access_token) = self.store().get(ACCESS_TOKEN_KEY) else {
            // No bearer token stored behaves like the 401 the transport
            // would have produced.
            self.observe_unauthorized();
            return Err(SessionError::Unauthorized);
        };

        let raw = match self.backend.fetch_me(&access_token).await {
            Ok(raw) => raw,
            Err(BackendError::Unauthorized) => {
                self.observe_unauthorized();
                return Err(SessionError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };

        let principal = normalize::normalize(&raw);

        if principal.is_correspondent() && principal.linked_entity.is_none() {
            debug!(
                login = %principal.login,
                "Correspondent link still unresolved after profile fetch"
            );
        }

        self.store()
            .put(PRINCIPAL_SNAPSHOT_KEY, &snapshot_json(&principal));
        self.publish(Some(principal.clone()));
        Ok(principal)
    }

    /// Probe the authentication backend with the stored access token.
    ///
    /// For hosts that want a restored session confirmed remotely before
    /// trusting it. An observed 401 tears the session down like any other
    /// guarded call.
    pub async fn validate_remote(&self) -> Result<(), SessionError> {
        let Some(access_token) = self.store().get(ACCESS_TOKEN_KEY) else {
            self.observe_unauthorized();
            return Err(SessionError::Unauthorized);
        };

        match self.backend.validate(&access_token).await {
            Ok(()) => Ok(()),
            Err(BackendError::Unauthorized) => {
                self.observe_unauthorized();
                Err(SessionError::Unauthorized)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Caller-driven principal overwrite after an out-of-band profile
    /// mutation. Persists and publishes without contacting the network.
    pub fn update_principal(&self, principal: Principal) {
        self.store()
            .put(PRINCIPAL_SNAPSHOT_KEY, &snapshot_json(&principal));
        self.publish(Some(principal));
    }

    /// React to a 401 observed on any guarded remote call: clear the store
    /// and publish `None`. Does not navigate; that is the guard's job.
    pub fn observe_unauthorized(&self) {
        self.store().clear();
        *self.session_id.lock().expect("session id lock poisoned") = None;
        self.publish(None);
        warn!("Unauthorized response observed; session torn down");
    }

    /// Resolve the linked correspondent id through the tiered fallback
    /// chain. `None` means the feature is unavailable for this principal,
    /// never an error.
    pub async fn resolve_correspondent_id(&self) -> Option<u64> {
        IdentityResolver::new(self).resolve().await
    }

    /// The durable principal snapshot, when present and parseable.
    pub(crate) fn snapshot_principal(&self) -> Option<Principal> {
        let raw = self.store().get(PRINCIPAL_SNAPSHOT_KEY)?;
        parse_snapshot(&raw)
    }

    fn publish(&self, principal: Option<Principal>) {
        // send_replace keeps publication synchronous with the causing write
        // and does not care whether anyone is subscribed.
        self.principal_tx.send_replace(principal);
    }
}

fn snapshot_json(principal: &Principal) -> String {
    serde_json::to_string(principal).unwrap_or_default()
}

/// Parse a stored snapshot; corrupt JSON is treated as absent, never thrown.
fn parse_snapshot(raw: &str) -> Option<Principal> {
    match serde_json::from_str(raw) {
        Ok(principal) => Some(principal),
        Err(e) => {
            warn!(error = %e, "Stored principal snapshot is malformed; ignoring");
            None
        }
    }
}

/// Session restore at construction: only a non-expired token revives the
/// last persisted principal.
fn restore_principal(store: &dyn CredentialStore) -> Option<Principal> {
    let access_token = store.get(ACCESS_TOKEN_KEY)?;
    if token::is_expired(&access_token) {
        return None;
    }
    let raw = store.get(PRINCIPAL_SNAPSHOT_KEY)?;
    parse_snapshot(&raw)
}
