//! Invite sources and the dispatch flow
//!
//! An invite originates from either a training session or a program
//! enrollment. The two carry mostly the same fields, so they are modeled as
//! one tagged variant with single accessors instead of optional-field
//! branching at every call site.
//!
//! [`InviteDispatcher`] is the standard caller of the allocator: select an
//! organizer, create the event on the provider, then report the attendee
//! set back for quota accounting. A usage-limit failure from the provider
//! suspends the organizer; there is no internal retry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::PoolCategory;
use crate::pool::{OrganizerPool, PoolError};
use crate::provider::{CalendarProvider, EventInvite, ProviderError};
use crate::store::CacheStore;

/// Origin of a calendar invite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InviteSource {
    /// A scheduled training session
    Training {
        title: String,
        product_type: String,
        delivery_type: String,
        /// Trainer running the session, when one is assigned
        trainer: Option<String>,
    },
    /// A program enrollment
    Program {
        title: String,
        product_type: String,
        delivery_type: String,
        /// Funding source of the program, when known
        funding_source: Option<String>,
    },
}

impl InviteSource {
    pub fn title(&self) -> &str {
        match self {
            InviteSource::Training { title, .. } | InviteSource::Program { title, .. } => title,
        }
    }

    pub fn product_type(&self) -> &str {
        match self {
            InviteSource::Training { product_type, .. }
            | InviteSource::Program { product_type, .. } => product_type,
        }
    }

    pub fn delivery_type(&self) -> &str {
        match self {
            InviteSource::Training { delivery_type, .. }
            | InviteSource::Program { delivery_type, .. } => delivery_type,
        }
    }

    /// The organizer pool category this invite draws from
    pub fn category(&self) -> PoolCategory {
        match self {
            InviteSource::Training { .. } => PoolCategory::Training,
            InviteSource::Program { .. } => PoolCategory::Program,
        }
    }
}

/// Errors from the dispatch flow
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result of a successful dispatch
#[derive(Debug, Clone)]
pub struct DispatchedInvite {
    /// Provider-assigned event id
    pub event_id: String,
    /// Organizer the invite was sent as
    pub organizer: String,
}

/// Sends invites through the provider using pool-allocated organizers
pub struct InviteDispatcher<S, P> {
    pool: OrganizerPool<S>,
    provider: Arc<P>,
}

impl<S: CacheStore, P: CalendarProvider> InviteDispatcher<S, P> {
    pub fn new(pool: OrganizerPool<S>, provider: Arc<P>) -> Self {
        Self { pool, provider }
    }

    /// The underlying allocator (for direct availability checks)
    pub fn pool(&self) -> &OrganizerPool<S> {
        &self.pool
    }

    /// Send one invite: allocate an organizer, create the event, record the
    /// attendee set against the organizer's quota.
    ///
    /// On a provider usage-limit failure the organizer is suspended and the
    /// error is surfaced; the caller decides whether to re-dispatch.
    pub async fn send_invite(
        &self,
        source: &InviteSource,
        invite: &EventInvite,
    ) -> Result<DispatchedInvite, DispatchError> {
        let category = source.category();
        let organizer = self.pool.select_organizer(category, None).await?;

        match self.provider.create_event(&organizer, invite).await {
            Ok(event_id) => {
                let organizer = self
                    .pool
                    .record_assignment(category, &organizer, &invite.attendees)
                    .await?;
                info!(
                    event_id = %event_id,
                    organizer = %organizer,
                    category = %category,
                    title = source.title(),
                    "invite dispatched"
                );
                Ok(DispatchedInvite {
                    event_id,
                    organizer,
                })
            }
            Err(e) if e.is_usage_limit() => {
                warn!(
                    organizer = %organizer,
                    category = %category,
                    "provider reported usage limit, suspending organizer"
                );
                self.pool.suspend(&organizer).await?;
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_source() -> InviteSource {
        InviteSource::Training {
            title: "Rust fundamentals".to_string(),
            product_type: "course".to_string(),
            delivery_type: "remote".to_string(),
            trainer: Some("trainer@example.org".to_string()),
        }
    }

    #[test]
    fn test_source_accessors() {
        let source = training_source();
        assert_eq!(source.title(), "Rust fundamentals");
        assert_eq!(source.product_type(), "course");
        assert_eq!(source.delivery_type(), "remote");
        assert_eq!(source.category(), PoolCategory::Training);
    }

    #[test]
    fn test_program_maps_to_program_category() {
        let source = InviteSource::Program {
            title: "Spring cohort".to_string(),
            product_type: "program".to_string(),
            delivery_type: "hybrid".to_string(),
            funding_source: None,
        };
        assert_eq!(source.category(), PoolCategory::Program);
    }

    #[test]
    fn test_source_serde_tagging() {
        let source = training_source();
        let json = serde_json::to_string(&source).unwrap();
        assert!(json.contains("\"kind\":\"training\""));
        let decoded: InviteSource = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.title(), source.title());
    }
}
