//! Pool state tracker
//!
//! Persists, per category, which organizer is current and the unique
//! external attendees accumulated under it. Every read goes back to the
//! cache store; the tracker keeps nothing in memory between calls.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{AllocatorConfig, PoolCategory, POOL_STATE_TTL};
use crate::state::PoolState;
use crate::store::{keys, CacheStore};

use super::PoolError;

/// Tracks per-category organizer assignment and quota accounting
pub struct PoolStateTracker<S> {
    config: Arc<AllocatorConfig>,
    store: Arc<S>,
}

impl<S: CacheStore> PoolStateTracker<S> {
    pub fn new(config: Arc<AllocatorConfig>, store: Arc<S>) -> Self {
        Self { config, store }
    }

    /// Current pool state for a category, absent if never set.
    ///
    /// A store read failure or malformed payload is also absent: callers
    /// proceed with fresh state rather than failing on an unreliable cache.
    pub async fn get_current(&self, category: PoolCategory) -> Result<Option<PoolState>, PoolError> {
        let key = keys::pool_state_key(category);
        let bytes = match self.store.get(&key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(category = %category, error = %e, "pool state read failed, treating as absent");
                return Ok(None);
            }
        };
        Ok(bytes.as_deref().and_then(PoolState::from_bytes))
    }

    /// Record an assignment for `organizer`, merging the external subset of
    /// `attendee_emails` into its accumulated set.
    ///
    /// The state is replaced wholesale when there is no existing entry, when
    /// the stored organizer differs (a reassignment must reset quota
    /// accounting, never carry it over), or when the stored set has already
    /// reached the attendee limit. Returns the organizer actually stored.
    pub async fn record_assignment(
        &self,
        category: PoolCategory,
        organizer: &str,
        attendee_emails: &[String],
    ) -> Result<String, PoolError> {
        let external: Vec<String> = attendee_emails
            .iter()
            .filter(|email| is_external(email, &self.config.internal_domain))
            .cloned()
            .collect();

        let limit = self.config.external_attendees_limit;
        let state = match self.get_current(category).await? {
            Some(mut state)
                if state.organizer == organizer && state.attendee_count() < limit =>
            {
                state
                    .unique_external_attendees
                    .extend(external.iter().cloned());
                debug!(
                    category = %category,
                    organizer = organizer,
                    attendees = state.attendee_count(),
                    "merged attendees into pool state"
                );
                state
            }
            previous => {
                let state = PoolState::new(organizer, external);
                debug!(
                    category = %category,
                    organizer = organizer,
                    previous_organizer = previous.as_ref().map(|s| s.organizer.as_str()),
                    attendees = state.attendee_count(),
                    "reset pool state"
                );
                state
            }
        };

        let key = keys::pool_state_key(category);
        let bytes = state.to_bytes()?;
        self.store.put(&key, bytes, POOL_STATE_TTL).await?;
        Ok(state.organizer)
    }
}

/// An attendee is external when its address is not under the organization's
/// own domain. Addresses without a domain part count as external.
pub(crate) fn is_external(email: &str, internal_domain: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| !domain.eq_ignore_ascii_case(internal_domain))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tracker(limit: usize) -> PoolStateTracker<MemoryStore> {
        let config = Arc::new(
            AllocatorConfig::new("example.org")
                .with_attendee_limit(limit)
                .with_category(
                    PoolCategory::Training,
                    vec!["org-a@example.org".to_string()],
                ),
        );
        PoolStateTracker::new(config, Arc::new(MemoryStore::new()))
    }

    fn emails(addrs: &[&str]) -> Vec<String> {
        addrs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("guest@other.com", "example.org"));
        assert!(!is_external("staff@example.org", "example.org"));
        assert!(!is_external("staff@EXAMPLE.ORG", "example.org"));
        // No domain part counts as external
        assert!(is_external("not-an-address", "example.org"));
    }

    #[tokio::test]
    async fn test_get_current_absent() {
        let tracker = tracker(10);
        let state = tracker.get_current(PoolCategory::Training).await.unwrap();
        assert!(state.is_none());
    }

    #[tokio::test]
    async fn test_record_merges_for_same_organizer() {
        let tracker = tracker(10);
        tracker
            .record_assignment(
                PoolCategory::Training,
                "org-a@example.org",
                &emails(&["one@ext.com"]),
            )
            .await
            .unwrap();
        tracker
            .record_assignment(
                PoolCategory::Training,
                "org-a@example.org",
                &emails(&["two@ext.com", "one@ext.com"]),
            )
            .await
            .unwrap();

        let state = tracker
            .get_current(PoolCategory::Training)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.organizer, "org-a@example.org");
        assert_eq!(state.attendee_count(), 2);
    }

    #[tokio::test]
    async fn test_record_resets_on_organizer_switch() {
        let tracker = tracker(10);
        tracker
            .record_assignment(
                PoolCategory::Training,
                "org-a@example.org",
                &emails(&["one@ext.com", "two@ext.com"]),
            )
            .await
            .unwrap();
        tracker
            .record_assignment(
                PoolCategory::Training,
                "org-b@example.org",
                &emails(&["three@ext.com"]),
            )
            .await
            .unwrap();

        let state = tracker
            .get_current(PoolCategory::Training)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.organizer, "org-b@example.org");
        assert_eq!(state.attendee_count(), 1);
        assert!(!state
            .unique_external_attendees
            .contains("one@ext.com"));
    }

    #[tokio::test]
    async fn test_record_replaces_at_limit() {
        let tracker = tracker(2);
        tracker
            .record_assignment(
                PoolCategory::Training,
                "org-a@example.org",
                &emails(&["one@ext.com", "two@ext.com"]),
            )
            .await
            .unwrap();

        // At the limit: the next assignment replaces instead of growing
        tracker
            .record_assignment(
                PoolCategory::Training,
                "org-a@example.org",
                &emails(&["three@ext.com"]),
            )
            .await
            .unwrap();

        let state = tracker
            .get_current(PoolCategory::Training)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.attendee_count(), 1);
        assert!(state
            .unique_external_attendees
            .contains("three@ext.com"));
    }

    #[tokio::test]
    async fn test_internal_attendees_excluded() {
        let tracker = tracker(10);
        tracker
            .record_assignment(
                PoolCategory::Training,
                "org-a@example.org",
                &emails(&["guest@ext.com", "staff@example.org"]),
            )
            .await
            .unwrap();

        let state = tracker
            .get_current(PoolCategory::Training)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.attendee_count(), 1);
        assert!(state.unique_external_attendees.contains("guest@ext.com"));
    }

    #[tokio::test]
    async fn test_returns_stored_organizer() {
        let tracker = tracker(10);
        let stored = tracker
            .record_assignment(PoolCategory::Training, "org-a@example.org", &[])
            .await
            .unwrap();
        assert_eq!(stored, "org-a@example.org");
    }
}
