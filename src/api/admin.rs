// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Admin area endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::{AdminGuard, RouteContext};
use crate::nav::TracingNavigator;
use crate::state::AppState;

/// Response for the admin reachability probe.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub status: String,
}

/// Admin-gated reachability probe.
///
/// Signed-out callers are redirected to login (with a return URL), signed-in
/// non-admins to unauthorized.
#[utoipa::path(
    get,
    path = "/v1/admin/ping",
    tag = "Admin",
    responses(
        (status = 200, description = "Caller is an admin", body = PingResponse),
        (status = 307, description = "Denied; redirected to login or unauthorized"),
    )
)]
pub async fn ping(State(state): State<AppState>) -> Response {
    let route = RouteContext::new("/v1/admin/ping");
    let guard = AdminGuard::new(state.session.clone(), Arc::new(TracingNavigator));
    if !guard.check(&route) {
        return super::deny_redirect(&state.session, &route);
    }

    Json(PingResponse {
        status: "ok".to_string(),
    })
    .into_response()
}
