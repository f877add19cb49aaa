//! Allocator configuration
//!
//! Explicit configuration injected at construction. The allocator holds no
//! module-level globals; every instance gets its own `AllocatorConfig`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cap on unique external attendees per organizer per category
pub const DEFAULT_EXTERNAL_ATTENDEES_LIMIT: usize = 2000;

/// How long a suspended organizer stays ineligible (fixed window)
pub const SUSPENSION_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Soft TTL on persisted pool state. Bounds growth of stale entries in the
/// cache store; not a correctness mechanism.
pub const POOL_STATE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Partition of the organizer space. Each category has its own candidate
/// list and fully independent pool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolCategory {
    /// Training session invites
    Training,
    /// Program enrollment invites
    Program,
}

impl PoolCategory {
    /// Stable identifier used in cache keys and env var lookup
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolCategory::Training => "training",
            PoolCategory::Program => "program",
        }
    }
}

impl fmt::Display for PoolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate organizers for one category, in declared order.
///
/// Declared order is the selection tie-break: the first available candidate
/// wins, biasing toward earlier-declared organizers.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    pub category: PoolCategory,
    pub organizers: Vec<String>,
}

/// Configuration for the organizer pool allocator
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// The organization's own email domain. Attendees under this domain are
    /// internal and never counted against quota.
    pub internal_domain: String,
    /// Max unique external attendees per (category, organizer) pair
    pub external_attendees_limit: usize,
    /// Per-category candidate organizer lists
    pub categories: Vec<CategoryConfig>,
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("internal_domain must not be empty")]
    MissingDomain,
    #[error("external_attendees_limit must be greater than zero")]
    ZeroLimit,
    #[error("category {0} has no candidate organizers")]
    NoOrganizers(PoolCategory),
    #[error("category {0} is configured more than once")]
    DuplicateCategory(PoolCategory),
}

impl AllocatorConfig {
    /// Create a config with the default attendee limit and no categories
    pub fn new(internal_domain: impl Into<String>) -> Self {
        Self {
            internal_domain: internal_domain.into(),
            external_attendees_limit: DEFAULT_EXTERNAL_ATTENDEES_LIMIT,
            categories: Vec::new(),
        }
    }

    /// Add a category with its candidate organizers (declared order kept)
    pub fn with_category(mut self, category: PoolCategory, organizers: Vec<String>) -> Self {
        self.categories.push(CategoryConfig {
            category,
            organizers,
        });
        self
    }

    /// Override the external attendee limit
    pub fn with_attendee_limit(mut self, limit: usize) -> Self {
        self.external_attendees_limit = limit;
        self
    }

    /// Candidate organizers for a category, in declared order.
    /// Empty slice if the category is not configured.
    pub fn organizers_for(&self, category: PoolCategory) -> &[String] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.organizers.as_slice())
            .unwrap_or(&[])
    }

    /// Configured categories, in declared order
    pub fn category_list(&self) -> impl Iterator<Item = PoolCategory> + '_ {
        self.categories.iter().map(|c| c.category)
    }

    /// Create config from environment variables.
    ///
    /// - `ORGANIZER_INTERNAL_DOMAIN`
    /// - `ORGANIZER_EXTERNAL_ATTENDEES_LIMIT` (optional override)
    /// - `ORGANIZER_TRAINING_POOL` / `ORGANIZER_PROGRAM_POOL`:
    ///   comma-separated organizer lists
    pub fn from_env() -> Self {
        let mut config =
            Self::new(std::env::var("ORGANIZER_INTERNAL_DOMAIN").unwrap_or_default());

        if let Ok(val) = std::env::var("ORGANIZER_EXTERNAL_ATTENDEES_LIMIT") {
            if let Ok(limit) = val.parse::<usize>() {
                config.external_attendees_limit = limit;
            }
        }

        for category in [PoolCategory::Training, PoolCategory::Program] {
            let var = format!("ORGANIZER_{}_POOL", category.as_str().to_uppercase());
            if let Ok(val) = std::env::var(&var) {
                let organizers: Vec<String> = val
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !organizers.is_empty() {
                    config = config.with_category(category, organizers);
                }
            }
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.internal_domain.is_empty() {
            return Err(ConfigError::MissingDomain);
        }
        if self.external_attendees_limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        for (i, cfg) in self.categories.iter().enumerate() {
            if cfg.organizers.is_empty() {
                return Err(ConfigError::NoOrganizers(cfg.category));
            }
            if self.categories[..i]
                .iter()
                .any(|c| c.category == cfg.category)
            {
                return Err(ConfigError::DuplicateCategory(cfg.category));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organizers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_limit() {
        let config = AllocatorConfig::new("example.org");
        assert_eq!(config.external_attendees_limit, 2000);
    }

    #[test]
    fn test_organizers_for_keeps_declared_order() {
        let config = AllocatorConfig::new("example.org")
            .with_category(PoolCategory::Training, organizers(&["a@x", "b@x", "c@x"]));

        assert_eq!(
            config.organizers_for(PoolCategory::Training),
            &["a@x", "b@x", "c@x"]
        );
        assert!(config.organizers_for(PoolCategory::Program).is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_domain() {
        let config = AllocatorConfig::new("");
        assert!(matches!(config.validate(), Err(ConfigError::MissingDomain)));
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let config =
            AllocatorConfig::new("example.org").with_category(PoolCategory::Training, vec![]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoOrganizers(PoolCategory::Training))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_category() {
        let config = AllocatorConfig::new("example.org")
            .with_category(PoolCategory::Training, organizers(&["a@x"]))
            .with_category(PoolCategory::Training, organizers(&["b@x"]));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateCategory(PoolCategory::Training))
        ));
    }

    #[test]
    fn test_category_as_str() {
        assert_eq!(PoolCategory::Training.as_str(), "training");
        assert_eq!(PoolCategory::Program.as_str(), "program");
    }
}
