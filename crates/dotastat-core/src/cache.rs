//! In-memory caching for API responses.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

/// Defines the behavior of the in-memory cache for an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read from the cache if a fresh entry is present;
    /// otherwise, fetch from the network and write the response to the cache. (Default)
    #[default]
    Use,
    /// Always fetch from the network, bypassing any cached entry,
    /// and write the new response to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

impl CacheMode {
    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        matches!(self, Self::Use | Self::Refresh)
    }
}

/// Builds the lookup key for a request.
///
/// Parameters are ordered by name, so equal parameter sets always produce the
/// same key regardless of how they were assembled.
pub fn cache_key(endpoint: &str, params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return endpoint.to_owned();
    }

    let query = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{endpoint}?{query}")
}

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub removed: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    payload: Value,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Thread-safe response cache with a single time-to-live.
///
/// Freshness is decided when an entry is read, so a stale entry is never
/// returned even before [`ResponseCache::sweep`] has physically removed it.
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a cache with the default TTL of 5 minutes.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(300))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload for `key` if an entry exists and is still fresh.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        self.read()
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.payload.clone())
    }

    /// Stores `payload` under `key`, replacing any previous entry and restarting its TTL.
    pub fn put(&self, key: impl Into<String>, payload: Value) {
        let entry = CacheEntry {
            stored_at: Instant::now(),
            payload,
        };
        self.write().insert(key.into(), entry);
    }

    /// Removes every entry whose age has reached the TTL.
    pub fn sweep(&self, now: Instant) -> SweepReport {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
        SweepReport {
            removed: before - entries.len(),
            remaining: entries.len(),
        }
    }

    pub fn sweep_expired(&self) -> SweepReport {
        self.sweep(Instant::now())
    }

    /// Number of stored entries, including stale ones not yet swept.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .read()
            .expect("response cache lock is not poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .write()
            .expect("response cache lock is not poisoned")
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn key_without_params_is_the_endpoint() {
        assert_eq!(cache_key("heroes", &BTreeMap::new()), "heroes");
    }

    #[test]
    fn key_ignores_parameter_insertion_order() {
        let mut forward = BTreeMap::new();
        forward.insert(String::from("q"), String::from("dendi"));
        forward.insert(String::from("api_key"), String::from("k"));

        let mut backward = BTreeMap::new();
        backward.insert(String::from("api_key"), String::from("k"));
        backward.insert(String::from("q"), String::from("dendi"));

        assert_eq!(cache_key("search", &forward), cache_key("search", &backward));
        assert_eq!(cache_key("search", &forward), "search?api_key=k&q=dendi");
    }

    #[test]
    fn key_distinguishes_values_containing_separators() {
        let split = params(&[("a", "1"), ("b", "2")]);
        let joined = params(&[("a", "1&b=2")]);

        assert_ne!(cache_key("search", &split), cache_key("search", &joined));
    }

    #[tokio::test(start_paused = true)]
    async fn put_then_get_returns_payload() {
        let cache = ResponseCache::new(Duration::from_secs(60));

        assert!(cache.get("heroes").is_none());

        cache.put("heroes", json!([{"id": 1}]));
        assert_eq!(cache.get("heroes"), Some(json!([{"id": 1}])));

        cache.put("heroes", json!([{"id": 2}]));
        assert_eq!(cache.get("heroes"), Some(json!([{"id": 2}])));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_exactly_at_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.put("players/1", json!({"wins": 10}));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get("players/1"), Some(json!({"wins": 10})));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("players/1").is_none());
        assert_eq!(cache.len(), 1, "stale entry stays until swept");
    }

    #[tokio::test(start_paused = true)]
    async fn reads_do_not_extend_freshness() {
        let cache = ResponseCache::new(Duration::from_secs(10));
        cache.put("heroes", json!([]));

        for _ in 0..9 {
            tokio::time::advance(Duration::from_secs(1)).await;
            assert!(cache.get("heroes").is_some());
        }

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("heroes").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_restarts_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(10));
        cache.put("heroes", json!(1));

        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("heroes", json!(2));

        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("heroes"), Some(json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_only_expired_entries() {
        let cache = ResponseCache::new(Duration::from_secs(100));

        for index in 0..4 {
            cache.put(format!("old/{index}"), json!(index));
        }
        tokio::time::advance(Duration::from_secs(60)).await;
        for index in 0..4 {
            cache.put(format!("new/{index}"), json!(index));
        }
        tokio::time::advance(Duration::from_secs(50)).await;

        let report = cache.sweep(Instant::now());

        assert_eq!(
            report,
            SweepReport {
                removed: 4,
                remaining: 4
            }
        );
        for index in 0..4 {
            assert!(cache.get(&format!("old/{index}")).is_none());
            assert_eq!(cache.get(&format!("new/{index}")), Some(json!(index)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn clear_drops_everything() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put("a", json!(1));
        cache.put("b", json!(2));

        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_mode_default_reads_and_writes() {
        let mode = CacheMode::default();

        assert_eq!(mode, CacheMode::Use);
        assert!(mode.reads() && mode.writes());
        assert!(!CacheMode::Refresh.reads() && CacheMode::Refresh.writes());
        assert!(!CacheMode::Bypass.reads() && !CacheMode::Bypass.writes());
    }
}
