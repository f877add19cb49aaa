//! Persisted pool records
//!
//! Typed records for everything the allocator keeps in the cache store.
//! Payloads are JSON; a payload that fails to decode is treated as absent
//! state rather than an error, so malformed entries can never wedge the
//! allocator.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-category pool state: the current organizer and the unique external
/// attendees accumulated under it.
///
/// The attendee set only grows for a fixed (category, organizer) pair; it is
/// reset wholesale when the organizer changes or the entry is evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Identity the invites for this category are currently sent as
    pub organizer: String,
    /// Deduplicated external attendee addresses assigned to this organizer
    pub unique_external_attendees: BTreeSet<String>,
}

impl PoolState {
    /// Create a fresh state for an organizer
    pub fn new(organizer: impl Into<String>, attendees: impl IntoIterator<Item = String>) -> Self {
        Self {
            organizer: organizer.into(),
            unique_external_attendees: attendees.into_iter().collect(),
        }
    }

    /// Number of unique external attendees accumulated so far
    pub fn attendee_count(&self) -> usize {
        self.unique_external_attendees.len()
    }

    /// Serialize for the cache store
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a stored payload. Malformed payloads map to `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice(bytes) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "malformed pool state payload, treating as absent");
                None
            }
        }
    }
}

/// Marker that an organizer is in its suspension cooldown.
///
/// The suspension lift is always computed from `suspended_at`; the record's
/// store-side TTL is best-effort only and may be paused while no evaluating
/// process is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspensionRecord {
    /// When the organizer was suspended
    pub suspended_at: DateTime<Utc>,
}

impl SuspensionRecord {
    /// Create a record suspended as of now
    pub fn now() -> Self {
        Self {
            suspended_at: Utc::now(),
        }
    }

    /// Wall-clock time elapsed since suspension
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.suspended_at
    }

    /// Serialize for the cache store
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a stored payload. Malformed payloads map to `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice(bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "malformed suspension record payload, treating as absent");
                None
            }
        }
    }
}
