//! In-memory, TTL-bounded caching of fetched payloads.
//!
//! Each [`CacheStore`] holds one payload type, so readers get a typed value
//! back without any downcasting. Several stores can share a TTL policy by
//! being constructed from the same duration.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::Ticker;

/// Payload categories the orchestrator caches independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    Quote,
    News,
    Prediction,
}

impl CacheCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::News => "news",
            Self::Prediction => "prediction",
        }
    }

    /// Namespaced key, e.g. `quote_AAPL`.
    pub fn key(self, ticker: &Ticker) -> String {
        format!("{}_{}", self.as_str(), ticker.as_str())
    }
}

impl Display for CacheCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Introspection snapshot. Counts include stale entries that have not been evicted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub count: usize,
    pub keys: Vec<String>,
}

impl CacheStats {
    pub fn merge(mut self, other: CacheStats) -> Self {
        self.count += other.count;
        self.keys.extend(other.keys);
        self.keys.sort();
        self
    }
}

#[derive(Debug)]
struct CacheEntry<T> {
    payload: Arc<T>,
    created_at: Instant,
}

#[derive(Debug)]
struct CacheInner<T> {
    map: HashMap<String, CacheEntry<T>>,
}

impl<T> CacheInner<T> {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    fn get(&self, key: &str, ttl: Duration) -> Option<Arc<T>> {
        self.map.get(key).and_then(|entry| {
            if entry.created_at.elapsed() < ttl {
                Some(Arc::clone(&entry.payload))
            } else {
                None
            }
        })
    }

    fn set(&mut self, key: String, payload: Arc<T>) {
        let entry = CacheEntry {
            payload,
            created_at: Instant::now(),
        };
        self.map.insert(key, entry);
    }

    fn clear_expired(&mut self, ttl: Duration) {
        self.map.retain(|_, entry| entry.created_at.elapsed() < ttl);
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn stats(&self) -> CacheStats {
        let mut keys = self.map.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        CacheStats {
            count: keys.len(),
            keys,
        }
    }
}

/// Thread-safe in-memory cache with a single TTL for every key.
///
/// Cloning yields another handle to the same entries.
#[derive(Debug)]
pub struct CacheStore<T> {
    inner: Arc<tokio::sync::RwLock<CacheInner<T>>>,
    ttl: Duration,
}

impl<T> Clone for CacheStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ttl: self.ttl,
        }
    }
}

impl<T: Send + Sync> CacheStore<T> {
    /// Create a cache store whose entries go stale `ttl` after they are set.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new())),
            ttl,
        }
    }

    /// Create a disabled cache: nothing is stored and every read misses.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Get the payload for `key` if it was set less than one TTL ago.
    ///
    /// Stale entries are reported as misses and left in place.
    pub async fn get(&self, key: &str) -> Option<Arc<T>> {
        let store = self.inner.read().await;
        store.get(key, self.ttl)
    }

    /// Store `payload` under `key`, replacing any prior entry, and return the
    /// shared handle that later hits will hand out.
    pub async fn set(&self, key: impl Into<String>, payload: T) -> Arc<T> {
        let payload = Arc::new(payload);
        self.set_shared(key, Arc::clone(&payload)).await;
        payload
    }

    /// Store an already shared payload under `key`.
    pub async fn set_shared(&self, key: impl Into<String>, payload: Arc<T>) {
        if self.is_disabled() {
            return;
        }

        let mut store = self.inner.write().await;
        store.set(key.into(), payload);
    }

    /// Remove entries that are already stale.
    pub async fn clear_expired(&self) {
        let mut store = self.inner.write().await;
        store.clear_expired(self.ttl);
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.clear();
    }

    /// Entry count and sorted keys. Has no side effects.
    pub async fn stats(&self) -> CacheStats {
        let store = self.inner.read().await;
        store.stats()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }
}
