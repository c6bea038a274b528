//! Response cache for successful GET requests.
//!
//! [`ResponseCache`] stores the `data` payload of successful responses,
//! keyed on [`CacheKey`]. Only the gateway writes to it, and only for GET
//! requests issued with caching enabled.
//!
//! Timestamps use [`tokio::time::Instant`], so tests can move the clock
//! with `tokio::time::pause()` / `advance()` instead of sleeping.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use super::{CacheKey, DEFAULT_CACHE_TTL};

/// A cached response payload and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub stored_at: Instant,
}

impl CacheEntry {
    /// Servable iff strictly younger than `ttl`.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Hit(Value),
    /// An entry existed but had outlived the TTL; it has been removed.
    Expired,
    Miss,
}

/// In-memory TTL cache of response data.
///
/// Unbounded: entries leave only when found stale on lookup or when the
/// cache is cleared.
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create an empty cache with the default five-minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up `key`, deleting the entry if it has gone stale.
    pub fn lookup(&self, key: &CacheKey) -> Lookup {
        let mut entries = self.entries();
        let Some(entry) = entries.get(key) else {
            return Lookup::Miss;
        };
        if entry.is_fresh(Instant::now(), self.ttl) {
            Lookup::Hit(entry.data.clone())
        } else {
            entries.remove(key);
            Lookup::Expired
        }
    }

    /// Convenience wrapper over [`lookup`](Self::lookup).
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        match self.lookup(key) {
            Lookup::Hit(data) => Some(data),
            Lookup::Expired | Lookup::Miss => None,
        }
    }

    /// Insert (or overwrite) `data` under `key`, stamped with the current time.
    pub fn insert(&self, key: CacheKey, data: Value) {
        let entry = CacheEntry {
            data,
            stored_at: Instant::now(),
        };
        self.entries().insert(key, entry);
    }

    /// Number of stored entries, including stale ones not yet looked up.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    // Every mutation is a single map operation, so a panic while the lock
    // was held cannot leave the map half-updated.
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Method;
    use serde_json::json;

    fn key(path: &str) -> CacheKey {
        CacheKey::new(Method::Get, path, &json!({}))
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let now = Instant::now();
        let entry = CacheEntry {
            data: json!(1),
            stored_at: now,
        };
        let ttl = Duration::from_secs(300);
        assert!(entry.is_fresh(now + Duration::from_secs(299), ttl));
        assert!(!entry.is_fresh(now + ttl, ttl));
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = ResponseCache::new();
        assert_eq!(cache.lookup(&key("/a")), Lookup::Miss);

        cache.insert(key("/a"), json!({"banner": []}));
        assert_eq!(cache.lookup(&key("/a")), Lookup::Hit(json!({"banner": []})));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_removed_on_lookup() {
        let cache = ResponseCache::new();
        cache.insert(key("/a"), json!(1));

        tokio::time::advance(DEFAULT_CACHE_TTL + Duration::from_secs(1)).await;

        // Still stored until somebody looks.
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&key("/a")), Lookup::Expired);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.lookup(&key("/a")), Lookup::Miss);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_ttl() {
        let cache = ResponseCache::with_ttl(Duration::from_secs(10));
        cache.insert(key("/a"), json!(1));

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(cache.get(&key("/a")), Some(json!(1)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&key("/a")), None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let cache = ResponseCache::new();
        cache.clear();
        cache.insert(key("/a"), json!(1));
        cache.insert(key("/b"), json!(2));
        cache.clear();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn grows_without_bound() {
        let cache = ResponseCache::new();
        for i in 0..5_000 {
            cache.insert(key(&format!("/item/{i}")), json!(i));
        }
        assert_eq!(cache.len(), 5_000);
    }
}
