// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

use std::{env, net::SocketAddr, sync::Arc};

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lexfield_session::api::router;
use lexfield_session::backend::{CorrespondentClient, HttpAuthBackend};
use lexfield_session::config::{CORRESPONDENT_BASE_URL_ENV, DATA_DIR_ENV};
use lexfield_session::session::SessionManager;
use lexfield_session::state::AppState;
use lexfield_session::store::{CredentialStore, FileStore, MemoryStore};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Remote collaborators
    let backend = HttpAuthBackend::from_env().expect("AUTH_BASE_URL must be configured");
    let correspondent_base = env::var(CORRESPONDENT_BASE_URL_ENV)
        .unwrap_or_else(|_| backend.base_url().to_string());
    let correspondents = Arc::new(
        CorrespondentClient::new(correspondent_base)
            .expect("Failed to build correspondent client"),
    );

    // Durable credential medium: file-backed when DATA_DIR is set, otherwise
    // in-memory (session does not survive a restart).
    let store: Box<dyn CredentialStore> = match env::var(DATA_DIR_ENV) {
        Ok(dir) => Box::new(FileStore::new(dir)),
        Err(_) => Box::new(MemoryStore::new()),
    };

    let session = Arc::new(SessionManager::new(Arc::new(backend), store));
    if session.current_principal().is_some() {
        info!("Restored previous session from credential store");
    }

    let state = AppState::new(session, correspondents);
    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");

    info!("LexField session facade listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
