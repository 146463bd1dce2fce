use std::collections::HashSet;
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::CoreError;
use crate::core::ledger::SwipeLedger;
use crate::core::rooms::MatchRoomDirectory;
use crate::models::{DiscoveryPolicy, Profile, UserId};
use crate::services::{IdentityStore, ProfileStore};

/// Selects the next page of candidate profiles for a user
///
/// # Pipeline Stages
/// 1. Load the user and their premium flag (a stale flag is honoured)
/// 2. Collect everyone the user swiped on today
/// 3. Block free users who reached the daily swipe quota
/// 4. Collect everyone the user holds a match room with
/// 5. Exclude those users and the user themself
/// 6. Fetch one page sized by tier, in store order
#[derive(Clone)]
pub struct DiscoveryEngine {
    identity: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
    ledger: SwipeLedger,
    directory: MatchRoomDirectory,
    policy: DiscoveryPolicy,
    clock: Arc<dyn Clock>,
}

impl DiscoveryEngine {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileStore>,
        ledger: SwipeLedger,
        directory: MatchRoomDirectory,
        policy: DiscoveryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity,
            profiles,
            ledger,
            directory,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &DiscoveryPolicy {
        &self.policy
    }

    pub async fn next_candidates(&self, user_id: UserId) -> Result<Vec<Profile>, CoreError> {
        let user = self
            .identity
            .get_user(user_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("user {}", user_id)))?;

        let today = self.clock.today();
        let swiped_today = self.ledger.decided_targets_today(user_id, today).await?;

        if !user.is_premium && swiped_today.len() >= self.policy.free_daily_swipe_quota {
            tracing::info!(
                "User {} reached the daily limit ({} swipes)",
                user_id,
                swiped_today.len()
            );
            return Err(CoreError::QuotaExceeded {
                limit: self.policy.free_daily_swipe_quota,
            });
        }

        let matched = self
            .directory
            .matched_targets(user_id, self.policy.match_exclusion, today)
            .await?;

        let mut excluded: HashSet<UserId> = swiped_today;
        excluded.extend(matched);
        excluded.insert(user_id);

        let limit = self.policy.page_size(user.is_premium);

        tracing::debug!(
            "Discovery for {}: premium={}, excluding {} users, limit {}",
            user_id,
            user.is_premium,
            excluded.len(),
            limit
        );

        let candidates = self.profiles.fetch_excluding(&excluded, limit).await?;

        tracing::info!("Returning {} candidates for user {}", candidates.len(), user_id);

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::models::{ProfileId, Swipe, SwipeId, User};
    use crate::services::{LogNotifier, MemoryStore, SwipeStore};
    use chrono::{Duration, Utc};

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
        engine: DiscoveryEngine,
    }

    fn fixture(policy: DiscoveryPolicy) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let ledger = SwipeLedger::new(store.clone(), clock.clone());
        let directory = MatchRoomDirectory::new(store.clone(), Arc::new(LogNotifier), clock.clone());
        let engine = DiscoveryEngine::new(
            store.clone(),
            store.clone(),
            ledger,
            directory,
            policy,
            clock.clone(),
        );
        Fixture { store, clock, engine }
    }

    async fn add_user(store: &MemoryStore, user: User) -> UserId {
        let id = user.id;
        store.upsert_user(&user).await.unwrap();
        let now = Utc::now();
        store
            .insert_profile(&Profile {
                id: ProfileId::new(),
                user_id: id,
                name: format!("User {}", id),
                bio: String::new(),
                image_url: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let fx = fixture(DiscoveryPolicy::default());
        let err = fx.engine.next_candidates(UserId::new()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_never_returns_self() {
        let fx = fixture(DiscoveryPolicy::default());
        let me = add_user(&fx.store, User::free(UserId::new())).await;
        let other = add_user(&fx.store, User::free(UserId::new())).await;

        let page = fx.engine.next_candidates(me).await.unwrap();
        let owners: Vec<UserId> = page.iter().map(|p| p.user_id).collect();
        assert_eq!(owners, vec![other]);
    }

    #[tokio::test]
    async fn test_page_size_and_quota_are_independent() {
        let policy = DiscoveryPolicy {
            free_daily_swipe_quota: 3,
            free_page_size: 2,
            ..DiscoveryPolicy::default()
        };
        let fx = fixture(policy);
        let me = add_user(&fx.store, User::free(UserId::new())).await;
        for _ in 0..5 {
            add_user(&fx.store, User::free(UserId::new())).await;
        }

        assert_eq!(fx.engine.next_candidates(me).await.unwrap().len(), 2);

        for _ in 0..3 {
            fx.store
                .insert_swipe(&Swipe {
                    id: SwipeId::new(),
                    user_id: me,
                    target_user_id: UserId::new(),
                    liked: false,
                    created_at: fx.clock.now(),
                })
                .await
                .unwrap();
        }

        let err = fx.engine.next_candidates(me).await.unwrap_err();
        assert!(matches!(err, CoreError::QuotaExceeded { limit: 3 }));
    }

    #[tokio::test]
    async fn test_stale_premium_flag_is_honoured() {
        let fx = fixture(DiscoveryPolicy::default());
        let lapsed = User::premium(UserId::new(), fx.clock.now() - Duration::days(1));
        let me = add_user(&fx.store, lapsed).await;

        for _ in 0..12 {
            fx.store
                .insert_swipe(&Swipe {
                    id: SwipeId::new(),
                    user_id: me,
                    target_user_id: UserId::new(),
                    liked: true,
                    created_at: fx.clock.now(),
                })
                .await
                .unwrap();
        }

        assert!(fx.engine.next_candidates(me).await.is_ok());
    }
}
