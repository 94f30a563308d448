// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Correspondent area endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::authz::{CorrespondentGuard, RouteContext};
use crate::backend::{BackendError, Correspondent, CorrespondentLookup};
use crate::nav::TracingNavigator;
use crate::state::AppState;

use super::error::ApiError;

/// Fetch the correspondent record linked to the current principal.
///
/// Guarded: correspondent role claim or correspondent account type. A
/// principal without a resolvable correspondent link gets 404 — the feature
/// is unavailable for them, which is not an error condition.
#[utoipa::path(
    get,
    path = "/v1/correspondent/me",
    tag = "Correspondent",
    responses(
        (status = 200, description = "Linked correspondent record", body = Correspondent),
        (status = 307, description = "Denied; redirected to login or unauthorized"),
        (status = 404, description = "No correspondent is linked to this principal"),
        (status = 502, description = "Lookup backend unavailable"),
    )
)]
pub async fn my_correspondent(State(state): State<AppState>) -> Response {
    let route = RouteContext::new("/v1/correspondent/me");
    let guard = CorrespondentGuard::new(state.session.clone(), Arc::new(TracingNavigator));
    if !guard.check(&route) {
        return super::deny_redirect(&state.session, &route);
    }

    let Some(id) = state.session.resolve_correspondent_id().await else {
        return ApiError::not_found("no correspondent is linked to this principal")
            .into_response();
    };

    let Some(token) = state.session.access_token() else {
        return ApiError::unauthorized("session has no access token").into_response();
    };

    match state.correspondents.fetch_correspondent(&token, id).await {
        Ok(record) => Json(record).into_response(),
        Err(BackendError::Unauthorized) => {
            // 401 on a guarded call tears the session down; the error still
            // reaches the caller.
            state.session.observe_unauthorized();
            ApiError::unauthorized("session is not authorized").into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
