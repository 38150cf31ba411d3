//! Time-bounded key/value cache

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// A concurrent cache whose entries expire after a fixed TTL
///
/// A zero TTL disables the cache entirely: inserts are dropped and lookups
/// always miss, so callers fall through to the underlying storage.
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache with the given entry lifetime
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a live entry, dropping it if it has expired
    pub fn get(&self, key: &K) -> Option<V> {
        if self.ttl.is_zero() {
            return None;
        }

        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
        }

        // Expired entries are removed lazily on access
        self.entries.remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    /// Store a value under the key, replacing any previous entry
    pub fn insert(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }

        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop a single entry
    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.clear();
    }
}
