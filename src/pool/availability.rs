//! Availability evaluator
//!
//! Decides whether an organizer may accept new assignments, applying both
//! the external-attendee quota and the 24h suspension window, and performs
//! the suspension when the quota is breached.
//!
//! The suspension lift is always computed from the persisted `suspended_at`
//! timestamp and performs an explicit delete. Store-side TTL eviction may be
//! paused while no evaluating process runs, so it is never trusted.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{AllocatorConfig, PoolCategory, SUSPENSION_WINDOW};
use crate::state::SuspensionRecord;
use crate::store::{keys, CacheStore};

use super::tracker::PoolStateTracker;
use super::PoolError;

/// Evaluates organizer availability and manages suspensions
pub struct AvailabilityEvaluator<S> {
    config: Arc<AllocatorConfig>,
    store: Arc<S>,
    tracker: PoolStateTracker<S>,
}

impl<S: CacheStore> AvailabilityEvaluator<S> {
    pub fn new(config: Arc<AllocatorConfig>, store: Arc<S>) -> Self {
        let tracker = PoolStateTracker::new(Arc::clone(&config), Arc::clone(&store));
        Self {
            config,
            store,
            tracker,
        }
    }

    /// Whether `organizer` may currently accept new assignments.
    ///
    /// Quota exhaustion in any category suspends the organizer and returns
    /// `false` unconditionally. Otherwise the answer is driven by the
    /// suspension record: absent means available; present and older than
    /// the suspension window means the suspension is lifted (the record is
    /// deleted explicitly); present and fresh means unavailable.
    pub async fn is_available(&self, organizer: &str) -> Result<bool, PoolError> {
        let limit = self.config.external_attendees_limit;
        let mut quota_exhausted = false;

        for category in self.config.category_list() {
            if let Some(state) = self.tracker.get_current(category).await? {
                if state.organizer == organizer && state.attendee_count() >= limit {
                    warn!(
                        organizer = organizer,
                        category = %category,
                        attendees = state.attendee_count(),
                        limit = limit,
                        "organizer exhausted external attendee quota"
                    );
                    quota_exhausted = true;
                }
            }
        }

        if quota_exhausted {
            self.suspend(organizer).await?;
            return Ok(false);
        }

        let key = keys::suspension_key(organizer);
        let bytes = match self.store.get(&key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(organizer = organizer, error = %e, "suspension read failed, treating as absent");
                return Ok(true);
            }
        };
        let Some(record) = bytes.as_deref().and_then(SuspensionRecord::from_bytes) else {
            return Ok(true);
        };

        let window = chrono::Duration::seconds(SUSPENSION_WINDOW.as_secs() as i64);
        if record.elapsed() > window {
            // Expired: lift explicitly instead of waiting on store eviction
            self.store.delete(&key).await?;
            info!(
                organizer = organizer,
                suspended_at = %record.suspended_at,
                "suspension window elapsed, lifted"
            );
            Ok(true)
        } else {
            debug!(
                organizer = organizer,
                suspended_at = %record.suspended_at,
                "organizer still suspended"
            );
            Ok(false)
        }
    }

    /// Suspend an organizer for the suspension window.
    ///
    /// Idempotent: a concurrent or redundant call simply overwrites the
    /// record. Any category whose pool state currently points at this
    /// organizer has that state deleted, so the next assignment request for
    /// it picks a fresh organizer from zero accumulated quota.
    pub async fn suspend(&self, organizer: &str) -> Result<(), PoolError> {
        let record = SuspensionRecord::now();
        let bytes = record.to_bytes()?;
        self.store
            .put(&keys::suspension_key(organizer), bytes, SUSPENSION_WINDOW)
            .await?;
        warn!(organizer = organizer, "organizer suspended");

        for category in self.config.category_list() {
            if let Some(state) = self.tracker.get_current(category).await? {
                if state.organizer == organizer {
                    self.store.delete(&keys::pool_state_key(category)).await?;
                    info!(
                        organizer = organizer,
                        category = %category,
                        "cleared pool state of suspended organizer"
                    );
                }
            }
        }

        Ok(())
    }

    /// Pick a usable organizer for a category.
    ///
    /// Order: the preferred organizer if given, then the category's current
    /// organizer, then the configured candidate list in declared order.
    /// The first available wins; there is no load-based ranking.
    pub async fn select_organizer(
        &self,
        category: PoolCategory,
        preferred: Option<&str>,
    ) -> Result<String, PoolError> {
        if let Some(preferred) = preferred {
            if self.is_available(preferred).await? {
                return Ok(preferred.to_string());
            }
        }

        if let Some(state) = self.tracker.get_current(category).await? {
            if preferred != Some(state.organizer.as_str())
                && self.is_available(&state.organizer).await?
            {
                return Ok(state.organizer);
            }
        }

        for candidate in self.config.organizers_for(category) {
            if self.is_available(candidate).await? {
                debug!(
                    category = %category,
                    organizer = %candidate,
                    "selected organizer from candidate list"
                );
                return Ok(candidate.clone());
            }
        }

        warn!(category = %category, "no organizer available");
        Err(PoolError::NoOrganizerAvailable(category))
    }
}
