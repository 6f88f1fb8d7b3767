/// Generic in-memory cache with per-entry TTL
///
/// Thread-safe, generic over key/value types. Expired entries are removed
/// lazily when read, or in bulk through `clear_expired`.
use super::config::CacheConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cache entry with TTL tracking
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            stored_at: now,
        }
    }

    /// Visible only while `now - stored_at < ttl`
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) >= ttl
    }
}

/// Cache metrics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub inserts: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Generic cache manager
///
/// Every entry is replaced whole under the write lock, so readers see either
/// the previous value or the new one.
pub struct CacheManager<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    config: CacheConfig,
    data: RwLock<HashMap<K, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    inserts: AtomicU64,
}

impl<K, V> CacheManager<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create new cache with given configuration
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            data: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Get value from cache (returns None if expired or missing)
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        {
            let data = self.data.read();
            match data.get(key) {
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
                Some(entry) if !entry.is_expired(self.config.ttl, now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Expired: re-check under the write lock, a writer may have refreshed it
        let mut data = self.data.write();
        let still_expired = data
            .get(key)
            .map(|entry| entry.is_expired(self.config.ttl, now))
            .unwrap_or(false);
        if still_expired {
            data.remove(key);
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store value, overwriting any previous entry for the key
    pub fn set(&self, key: K, value: V) {
        self.set_at(key, value, Instant::now());
    }

    pub(crate) fn set_at(&self, key: K, value: V, now: Instant) {
        self.data.write().insert(key, CacheEntry::new(value, now));
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove specific key from cache
    pub fn remove(&self, key: &K) -> Option<V> {
        self.data.write().remove(key).map(|entry| entry.value)
    }

    /// Clear all entries
    pub fn clear(&self) {
        self.data.write().clear();
    }

    /// Drop every expired entry, returning how many were removed
    pub fn clear_expired(&self) -> usize {
        self.clear_expired_at(Instant::now())
    }

    pub(crate) fn clear_expired_at(&self, now: Instant) -> usize {
        let ttl = self.config.ttl;
        let mut data = self.data.write();
        let before = data.len();
        data.retain(|_, entry| !entry.is_expired(ttl, now));
        let removed = before - data.len();
        self.expirations
            .fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    /// Get current metrics
    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
        }
    }

    /// Number of stored entries, expired ones included until evicted
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
