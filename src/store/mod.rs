//! Durable cache store boundary
//!
//! All shared mutable state lives behind the [`CacheStore`] trait: the
//! allocator itself is stateless in-process, which makes it safe for many
//! concurrent callers across service instances sharing one store.
//!
//! Store TTLs are best-effort. Eviction may be paused while no process is
//! running, so nothing in the allocator relies on a key disappearing when
//! its TTL elapses.

pub mod keys;
pub mod memory;

pub use memory::MemoryStore;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the cache store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the operation
    #[error("store backend error: {0}")]
    Backend(String),

    /// The backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store with per-key TTL (allows different backends)
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value. `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value with a TTL. Overwrites any existing entry.
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
