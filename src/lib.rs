//! organizer-pool - organizer allocation for outgoing calendar invites
//!
//! A calendar-sending "organizer" identity is a scarce resource: the
//! provider caps how many external recipients one identity may invite. This
//! crate tracks that quota per organizer pool category, suspends organizers
//! that breach it (or that the provider reports over its usage limit) for
//! 24 hours, and selects a usable organizer for each outgoing invite.
//!
//! ## Components
//!
//! - **Pool**: quota tracking, suspension, and organizer selection over an
//!   injected cache store ([`OrganizerPool`])
//! - **Store**: the durable key-value boundary plus an in-memory
//!   implementation ([`CacheStore`], [`MemoryStore`])
//! - **Provider**: the opaque calendar API port ([`CalendarProvider`])
//! - **Invite**: invite source variants and the standard dispatch flow
//!   ([`InviteDispatcher`])
//!
//! All state lives in the store; the allocator keeps nothing in memory
//! between calls, so any number of service instances can share one store.

pub mod config;
pub mod invite;
pub mod pool;
pub mod provider;
pub mod state;
pub mod store;

pub use config::{AllocatorConfig, CategoryConfig, ConfigError, PoolCategory};
pub use invite::{DispatchError, DispatchedInvite, InviteDispatcher, InviteSource};
pub use pool::{OrganizerPool, PoolError};
pub use provider::{CalendarProvider, EventInvite, ProviderError};
pub use state::{PoolState, SuspensionRecord};
pub use store::{CacheStore, MemoryStore, StoreError};
