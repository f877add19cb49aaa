//! Calendar provider port
//!
//! The allocator treats the scheduling API as opaque. The only provider
//! semantics it depends on is the usage-limit signal, which callers map to
//! [`crate::pool::OrganizerPool::suspend`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the calendar provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider refused the operation because the organizer identity
    /// hit its sending limits
    #[error("usage limit exceeded for organizer {organizer}")]
    UsageLimitExceeded { organizer: String },

    /// The referenced event does not exist
    #[error("event not found: {0}")]
    NotFound(String),

    /// Any other provider failure
    #[error("provider request failed: {0}")]
    Request(String),
}

impl ProviderError {
    /// Whether this failure should suspend the organizer it was issued for
    pub fn is_usage_limit(&self) -> bool {
        matches!(self, ProviderError::UsageLimitExceeded { .. })
    }
}

/// Calendar event to send as an invite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInvite {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Invitee addresses, internal and external mixed
    pub attendees: Vec<String>,
}

/// Trait for calendar provider operations (allows mocking in tests)
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Create an event under the given organizer identity, returning the
    /// provider's event id
    async fn create_event(
        &self,
        organizer: &str,
        invite: &EventInvite,
    ) -> Result<String, ProviderError>;

    /// Update an existing event
    async fn update_event(
        &self,
        organizer: &str,
        event_id: &str,
        invite: &EventInvite,
    ) -> Result<(), ProviderError>;

    /// Delete an event
    async fn delete_event(&self, organizer: &str, event_id: &str) -> Result<(), ProviderError>;
}
