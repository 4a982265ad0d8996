//! In-memory TTL cache store.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use quarry_core::{CacheStore, ResponseEnvelope};

struct CachedEntry {
    expires_at: Instant,
    value: ResponseEnvelope,
}

/// Process-local cache store with per-entry expiry stamps.
///
/// Entries are evicted lazily on read; consistency is last-write-wins via
/// the underlying sharded map. Suitable as the default store for a single
/// process - anything shared across processes belongs behind the same
/// [`CacheStore`] trait.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CachedEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live and expired-but-unswept entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<ResponseEnvelope> {
        {
            let entry = self.entries.get(key)?;
            if Instant::now() < entry.expires_at {
                return Some(entry.value.clone());
            }
        }
        // Guard dropped above; removing while holding it would deadlock.
        self.entries.remove(key);
        None
    }

    fn put(&self, key: &str, ttl: Duration, value: ResponseEnvelope) {
        self.entries.insert(
            key.to_string(),
            CachedEntry {
                expires_at: Instant::now() + ttl,
                value,
            },
        );
    }

    fn forget(&self, key: &str) {
        self.entries.remove(key);
    }
}
