// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 LexField

//! Correspondent business-entity lookup with an in-process cache.
//!
//! Correspondent records change rarely and are fetched on every visit to the
//! correspondent area, so lookups go through a small LRU with a TTL.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::{BackendError, CorrespondentLookup};

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CACHE_CAPACITY: usize = 64;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// A correspondent business entity (contracted field agent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Correspondent {
    pub id: u64,
    /// Display name of the correspondent or agency
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default = "default_active", alias = "ativo")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Cached entry: record + insertion timestamp.
struct CacheEntry {
    record: Correspondent,
    inserted_at: Instant,
}

/// HTTP client for the correspondent lookup backend.
pub struct CorrespondentClient {
    base_url: String,
    http: Client,
    cache: Mutex<LruCache<u64, CacheEntry>>,
    ttl: Duration,
}

impl CorrespondentClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl: DEFAULT_CACHE_TTL,
        })
    }

    /// Override the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn cached(&self, id: u64) -> Option<Correspondent> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&id) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.record.clone());
            }
            // Expired entry
            cache.pop(&id);
        }
        None
    }

    fn store(&self, record: Correspondent) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                record.id,
                CacheEntry {
                    record,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    /// Drop the cached record for a correspondent, if any.
    pub fn invalidate(&self, id: u64) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.pop(&id);
        }
    }
}

#[async_trait]
impl CorrespondentLookup for CorrespondentClient {
    async fn fetch_correspondent(
        &self,
        access_token: &str,
        id: u64,
    ) -> Result<Correspondent, BackendError> {
        if let Some(record) = self.cached(id) {
            debug!(correspondent_id = id, "Correspondent served from cache");
            return Ok(record);
        }

        let response = self
            .http
            .get(format!("{}/correspondent/{id}", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            return Err(BackendError::Request(format!(
                "HTTP {status} from correspondent lookup"
            )));
        }

        let record: Correspondent = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        self.store(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_correspondent(id: u64) -> Correspondent {
        Correspondent {
            id,
            name: "Souza & Filhos".to_string(),
            email: Some("contato@souza.example.com".to_string()),
            city: Some("Curitiba".to_string()),
            active: true,
        }
    }

    #[test]
    fn cache_put_and_get() {
        let client = CorrespondentClient::new("https://api.example.com").unwrap();
        assert!(client.cached(7).is_none());

        client.store(sample_correspondent(7));
        assert_eq!(client.cached(7), Some(sample_correspondent(7)));
    }

    #[test]
    fn cache_ttl_expiry() {
        let client = CorrespondentClient::new("https://api.example.com")
            .unwrap()
            .with_cache_ttl(Duration::from_millis(1));

        client.store(sample_correspondent(7));
        std::thread::sleep(Duration::from_millis(5));
        assert!(client.cached(7).is_none());
    }

    #[test]
    fn cache_invalidate() {
        let client = CorrespondentClient::new("https://api.example.com").unwrap();
        client.store(sample_correspondent(7));
        client.invalidate(7);
        assert!(client.cached(7).is_none());
    }

    #[test]
    fn deserializes_portuguese_field_names() {
        let record: Correspondent = serde_json::from_value(serde_json::json!({
            "id": 9,
            "nome": "Agência Lima",
            "cidade": "Recife",
            "ativo": false,
        }))
        .unwrap();

        assert_eq!(record.name, "Agência Lima");
        assert_eq!(record.city.as_deref(), Some("Recife"));
        assert!(!record.active);
    }
}
