//! Matchmaker - swipe, match and discovery core for a dating service
//!
//! This library records directional swipes, turns mutual likes into match
//! rooms, and selects which profiles a user is shown next under the free and
//! premium discovery quotas.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{CoreError, MatchCore, Stores, SwipeOutcome};
pub use self::models::{DiscoveryPolicy, MatchId, MatchRoom, Message, Profile, Swipe, User, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let policy = DiscoveryPolicy::default();
        assert!(policy.premium_page_size > policy.free_page_size);
    }
}
