// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! # HTTP Facade
//!
//! The session boundary mounted as an Axum app: login/logout/refresh, the
//! current principal, the guarded admin and correspondent areas, and health
//! probes. Everything here is a thin mapping onto the session core; guard
//! denials become HTTP redirects.

use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::authz::RouteContext;
use crate::backend::{Correspondent, LoginCredentials, TokenPair};
use crate::principal::PrincipalType;
use crate::session::SessionManager;
use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod correspondent;
pub mod error;
pub mod health;

pub use error::ApiError;

/// Map a guard denial onto the HTTP navigation it implies: signed-out
/// callers go to login with the route preserved, signed-in ones to the
/// unauthorized screen.
pub(crate) fn deny_redirect(session: &SessionManager, route: &RouteContext) -> Response {
    if session.is_authenticated() {
        Redirect::temporary("/unauthorized").into_response()
    } else {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("returnUrl", &route.url)
            .finish();
        Redirect::temporary(&format!("/login?{query}")).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me))
        .route("/auth/validate", get(auth::validate))
        .route("/auth/session", get(auth::session_status))
        .route("/admin/ping", get(admin::ping))
        .route("/correspondent/me", get(correspondent::my_correspondent))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::refresh,
        auth::me,
        auth::validate,
        auth::session_status,
        admin::ping,
        correspondent::my_correspondent,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            auth::PrincipalResponse,
            auth::SessionStatusResponse,
            admin::PingResponse,
            LoginCredentials,
            TokenPair,
            Correspondent,
            PrincipalType,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Auth", description = "Session lifecycle"),
        (name = "Admin", description = "Admin-gated endpoints"),
        (name = "Correspondent", description = "Correspondent area"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
