// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

use std::sync::Arc;

use crate::backend::CorrespondentClient;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionManager>,
    pub correspondents: Arc<CorrespondentClient>,
}

impl AppState {
    pub fn new(session: Arc<SessionManager>, correspondents: Arc<CorrespondentClient>) -> Self {
        Self {
            session,
            correspondents,
        }
    }
}
