// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! File-backed credential store.
//!
//! One file per key under a data directory. Values are always written whole
//! (no partial updates), so a crash mid-write cannot interleave two sessions'
//! credentials. The [`CredentialStore`] contract is infallible; I/O failures
//! are logged and absorbed here rather than surfaced to the session layer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::CredentialStore;

/// Credential store persisting each key as a file under `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// Safe to call multiple times on the same path (idempotent).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if let Err(e) = fs::create_dir_all(&root) {
            warn!(path = %root.display(), error = %e, "Failed to create credential directory");
        }
        Self { root }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are well-known identifiers; strip anything path-like anyway.
        let safe: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        self.root.join(safe)
    }

    /// The directory backing this store.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CredentialStore for FileStore {
    fn put(&mut self, key: &str, value: &str) {
        let path = self.key_path(key);
        if let Err(e) = fs::write(&path, value) {
            warn!(key, error = %e, "Failed to persist credential value");
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read credential value");
                None
            }
        }
    }

    fn remove(&mut self, key: &str) {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(key, error = %e, "Failed to remove credential value"),
        }
    }

    fn clear(&mut self) {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.root.display(), error = %e, "Failed to clear credential directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                if let Err(e) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "Failed to remove credential file");
                }
            }
        }
    }
}
