//! Cached option holder with TTL and refresh support.
//!
//! Wraps any [`OptionHolder`] with an in-memory value cache to reduce load on
//! the secrets backend for frequently read options. The inner holder is
//! unaware of the decorator; writes go through to the backend and update the
//! cache only when they succeed.
//!
//! Cached values live in memory only and are dropped on restart. TTL keeps
//! reads from serving stale options forever; `refresh_option` supports
//! rotation scenarios without waiting for expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::holder::OptionHolder;
use super::types::WriteOutcome;
use crate::errors::Result;

/// Cached option value with its fetch time.
#[derive(Debug, Clone)]
struct CachedValue {
    value: Value,
    cached_at: Instant,
}

impl CachedValue {
    fn new(value: Value) -> Self {
        Self { value, cached_at: Instant::now() }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() > ttl
    }
}

/// TTL-caching decorator over any [`OptionHolder`].
///
/// Cache entries are keyed by (resolved keyspace, option key). Only present
/// values are cached; a missing key is re-checked against the backend on
/// every read so newly written options appear without waiting for expiry.
pub struct CachedOptionHolder<H: OptionHolder> {
    inner: H,
    cache: RwLock<HashMap<(String, String), CachedValue>>,
    ttl: Duration,
}

impl<H: OptionHolder> CachedOptionHolder<H> {
    /// Wrap `inner` with a cache whose entries expire after `ttl`.
    pub fn new(inner: H, ttl: Duration) -> Self {
        Self { inner, cache: RwLock::new(HashMap::new()), ttl }
    }

    /// Force-fetch one option from the backend and update the cache.
    pub async fn refresh_option(&self, key: &str, keyspace: Option<&str>) -> Result<()> {
        let cache_key = self.cache_key(key, keyspace);
        match self.inner.option_value(key, keyspace).await? {
            Some(value) => {
                self.cache.write().await.insert(cache_key, CachedValue::new(value));
                debug!(key = %key, "Refreshed option in cache");
            }
            None => {
                self.cache.write().await.remove(&cache_key);
                debug!(key = %key, "Option gone from backend, dropped from cache");
            }
        }
        Ok(())
    }

    /// Drop every cached value. The next read fetches from the backend.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        let count = cache.len();
        cache.clear();
        debug!(count = count, "Cleared option cache");
    }

    /// Number of option values currently cached.
    pub async fn cache_size(&self) -> usize {
        self.cache.read().await.len()
    }

    fn cache_key(&self, key: &str, keyspace: Option<&str>) -> (String, String) {
        let keyspace = match keyspace {
            Some(ks) if !ks.is_empty() => ks,
            _ => self.inner.default_keyspace(),
        };
        (keyspace.to_string(), key.to_string())
    }
}

#[async_trait]
impl<H: OptionHolder> OptionHolder for CachedOptionHolder<H> {
    fn default_keyspace(&self) -> &str {
        self.inner.default_keyspace()
    }

    async fn option_value(&self, key: &str, keyspace: Option<&str>) -> Result<Option<Value>> {
        let cache_key = self.cache_key(key, keyspace);

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(&cache_key) {
                if !cached.is_expired(self.ttl) {
                    debug!(key = %key, keyspace = %cache_key.0, "Option cache hit");
                    return Ok(Some(cached.value.clone()));
                }
            }
        }

        let value = self.inner.option_value(key, keyspace).await?;
        if let Some(ref value) = value {
            let mut cache = self.cache.write().await;
            cache.insert(cache_key, CachedValue::new(value.clone()));
        }
        Ok(value)
    }

    async fn set_option_value(
        &self,
        key: &str,
        value: Value,
        keyspace: Option<&str>,
    ) -> WriteOutcome {
        let outcome = self.inner.set_option_value(key, value.clone(), keyspace).await;

        if outcome.ok {
            let cache_key = self.cache_key(key, keyspace);
            let mut cache = self.cache.write().await;
            cache.insert(cache_key, CachedValue::new(value));
            debug!(key = %key, "Updated option cache after write");
        }

        outcome
    }
}
