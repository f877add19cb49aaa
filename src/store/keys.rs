//! Cache key definitions
//!
//! Namespaced string keys for everything the allocator persists. The format
//! is shared state between every process instance using the same store, so
//! the tests below pin it down.

use crate::config::PoolCategory;

/// Namespace prefix for all allocator keys
const PREFIX: &str = "organizer-pool";

/// Key for a category's pool state entry
pub fn pool_state_key(category: PoolCategory) -> String {
    format!("{}:state:{}", PREFIX, category.as_str())
}

/// Key for an organizer's suspension record
pub fn suspension_key(organizer: &str) -> String {
    format!("{}:suspended:{}", PREFIX, organizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_state_key_format() {
        assert_eq!(
            pool_state_key(PoolCategory::Training),
            "organizer-pool:state:training"
        );
        assert_eq!(
            pool_state_key(PoolCategory::Program),
            "organizer-pool:state:program"
        );
    }

    #[test]
    fn test_suspension_key_format() {
        assert_eq!(
            suspension_key("org-a@example.org"),
            "organizer-pool:suspended:org-a@example.org"
        );
    }

    #[test]
    fn test_keys_are_disjoint() {
        // A category name can never collide with an organizer address
        assert_ne!(
            pool_state_key(PoolCategory::Training),
            suspension_key("training")
        );
    }
}
