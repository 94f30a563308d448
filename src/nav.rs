// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Navigation side-effect seam.
//!
//! Guards and logout resolve to a navigation, but what "navigate" means
//! belongs to the hosting application (an HTTP redirect, a view switch, a
//! deep link). The seam is a trait handed into the session layer instead of
//! an ambient router global.

use std::sync::Arc;

use tracing::info;

/// A navigation requested by a guard or by logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Send the caller to the login screen, optionally remembering where
    /// they were headed.
    Login { return_url: Option<String> },
    /// Send the caller to the unauthorized screen.
    Unauthorized,
}

/// Receiver of navigation side effects.
pub trait Navigator: Send + Sync {
    fn navigate(&self, nav: Navigation);
}

/// Default navigator: records the request in the log and nothing else.
///
/// Hosts that render their own redirects (the HTTP facade does) keep this one.
#[derive(Debug, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, nav: Navigation) {
        match nav {
            Navigation::Login { return_url } => {
                info!(return_url = return_url.as_deref(), "Navigating to login")
            }
            Navigation::Unauthorized => info!("Navigating to unauthorized"),
        }
    }
}

/// Test double capturing every navigation in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    recorded: std::sync::Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Navigations observed so far, oldest first.
    pub fn recorded(&self) -> Vec<Navigation> {
        self.recorded.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, nav: Navigation) {
        self.recorded.lock().expect("navigator lock").push(nav);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_navigator_captures_in_order() {
        let nav = RecordingNavigator::new();
        nav.navigate(Navigation::Unauthorized);
        nav.navigate(Navigation::Login { return_url: None });

        assert_eq!(
            nav.recorded(),
            vec![
                Navigation::Unauthorized,
                Navigation::Login { return_url: None },
            ]
        );
    }
}
