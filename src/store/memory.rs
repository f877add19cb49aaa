//! In-memory cache store
//!
//! `DashMap`-backed [`CacheStore`] implementation with per-key TTL. Expired
//! entries are dropped lazily on read; a periodic [`MemoryStore::cleanup`]
//! sweep reclaims the rest. Used by the test suite and by embedders that
//! run without an external store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};

use super::{CacheStore, StoreError};

/// Stored entry with absolute expiry
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Concurrent in-memory store with TTL support
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of live (non-expired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.expires_at > now).count()
    }

    /// Check if the store holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all expired entries. Returns the number removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed = removed, "memory store cleanup removed expired entries");
        }
        removed
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(entry) = self.entries.get(key) {
            if Instant::now() < entry.expires_at {
                return Ok(Some(entry.value.clone()));
            }
            // Expired, drop it on the way out
            drop(entry);
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Spawn a background task to periodically sweep expired entries
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            store.cleanup();
        }
    });
    info!(
        interval_secs = interval.as_secs(),
        "memory store cleanup task started"
    );
}
