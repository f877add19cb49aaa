//! Organizer pool allocator
//!
//! Assigns a calendar-sending organizer identity to outgoing invite
//! operations while enforcing a quota on unique external recipients per
//! organizer, suspending organizers that breach it for 24 hours.
//!
//! Two components share the injected cache store:
//!
//! - [`tracker::PoolStateTracker`]: per-category persistence of the current
//!   organizer and its accumulated external attendee set
//! - [`availability::AvailabilityEvaluator`]: quota + suspension decisions
//!   and organizer selection
//!
//! [`OrganizerPool`] wires both behind one facade. The allocator is
//! stateless in-process; every decision re-reads the store, so any number
//! of concurrent callers and service instances can share one store. The
//! read-modify-write sequences are not atomic: a slight overshoot of the
//! attendee limit under true concurrency is an accepted limitation of the
//! store contract, tolerable at this domain's rate.

pub mod availability;
pub mod tracker;

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AllocatorConfig, PoolCategory};
use crate::state::PoolState;
use crate::store::{CacheStore, StoreError};

use availability::AvailabilityEvaluator;
use tracker::PoolStateTracker;

/// Errors surfaced by the allocator
#[derive(Debug, Error)]
pub enum PoolError {
    /// Every candidate organizer for the category is quota-exhausted or
    /// suspended. Recoverable: report upstream as a capacity condition.
    #[error("no organizer available for category {0}")]
    NoOrganizerAvailable(PoolCategory),

    /// A cache store write or delete failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A record could not be serialized for persistence
    #[error("state serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Facade over the pool state tracker and the availability evaluator
pub struct OrganizerPool<S> {
    config: Arc<AllocatorConfig>,
    tracker: PoolStateTracker<S>,
    evaluator: AvailabilityEvaluator<S>,
}

impl<S: CacheStore> OrganizerPool<S> {
    /// Create an allocator over an injected config and cache store
    pub fn new(config: Arc<AllocatorConfig>, store: Arc<S>) -> Self {
        let tracker = PoolStateTracker::new(Arc::clone(&config), Arc::clone(&store));
        let evaluator = AvailabilityEvaluator::new(Arc::clone(&config), store);
        Self {
            config,
            tracker,
            evaluator,
        }
    }

    /// The injected configuration
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Current pool state for a category, absent if never set
    pub async fn current_state(
        &self,
        category: PoolCategory,
    ) -> Result<Option<PoolState>, PoolError> {
        self.tracker.get_current(category).await
    }

    /// Pick a usable organizer for a category; preferred organizer first,
    /// then the current one, then the candidate list in declared order
    pub async fn select_organizer(
        &self,
        category: PoolCategory,
        preferred: Option<&str>,
    ) -> Result<String, PoolError> {
        self.evaluator.select_organizer(category, preferred).await
    }

    /// Report a completed assignment: merge the external subset of the
    /// attendee list into the organizer's quota accounting. Returns the
    /// organizer actually stored.
    pub async fn record_assignment(
        &self,
        category: PoolCategory,
        organizer: &str,
        attendee_emails: &[String],
    ) -> Result<String, PoolError> {
        self.tracker
            .record_assignment(category, organizer, attendee_emails)
            .await
    }

    /// Whether an organizer may currently accept new assignments
    pub async fn is_available(&self, organizer: &str) -> Result<bool, PoolError> {
        self.evaluator.is_available(organizer).await
    }

    /// Suspend an organizer for the 24h window. Also invoked directly when
    /// the calendar provider reports a usage-limit condition.
    pub async fn suspend(&self, organizer: &str) -> Result<(), PoolError> {
        self.evaluator.suspend(organizer).await
    }
}
