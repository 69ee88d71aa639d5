//! Process-local TTL cache over a concurrent map.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// A cached entry with TTL support.
///
/// The payload is the serialized response body. It is wrapped in `Arc` so a
/// hit hands out a cheap clone of the pointer instead of copying the bytes.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
}

/// In-process cache with per-entry TTLs.
///
/// Expired entries are treated as absent on read and removed lazily; there
/// is no background sweeper. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct CacheBackend {
    entries: Arc<DashMap<String, CachedEntry>>,
}

impl CacheBackend {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Looks up a key, filtering out expired entries.
    pub fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired() {
                return Some(Arc::clone(&entry.data));
            }
        }
        // The predicate re-checks expiry under the shard lock so a fresh
        // entry inserted for the same key in the meantime is not dropped.
        self.entries.remove_if(key, |_, entry| entry.is_expired());
        None
    }

    /// Stores a value under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        self.entries
            .insert(key.to_string(), CachedEntry::new(value, ttl));
    }

    /// Drops the entry for `key`, expired or not.
    pub fn invalidate(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            tracing::debug!(key = %key, "Cache entry invalidated");
        }
    }

    /// Current entry count, including entries that have expired but have
    /// not been touched since.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
        }
    }
}
