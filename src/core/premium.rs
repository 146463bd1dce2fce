use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::CoreError;
use crate::models::UserId;
use crate::services::IdentityStore;

/// Premium subscription activation and expiry
///
/// Billing happens elsewhere; this only flips the flag the discovery policy
/// reads.
#[derive(Clone)]
pub struct PremiumService {
    identity: Arc<dyn IdentityStore>,
    clock: Arc<dyn Clock>,
}

impl PremiumService {
    pub fn new(identity: Arc<dyn IdentityStore>, clock: Arc<dyn Clock>) -> Self {
        Self { identity, clock }
    }

    pub async fn subscribe(&self, user: UserId, expires_at: DateTime<Utc>) -> Result<(), CoreError> {
        if expires_at <= self.clock.now() {
            return Err(CoreError::Validation(
                "premium expiry must be in the future".to_string(),
            ));
        }

        self.identity
            .set_premium_status(user, true, Some(expires_at))
            .await?;

        tracing::info!("User {} is premium until {}", user, expires_at);
        Ok(())
    }

    /// Downgrade every premium user whose expiry is before now.
    /// Returns how many were downgraded; individual failures are skipped.
    pub async fn expire_lapsed(&self) -> Result<usize, CoreError> {
        let now = self.clock.now();
        let premium = self.identity.list_premium_users().await?;

        let mut downgraded = 0;
        for user in premium.iter().filter(|u| u.premium_lapsed(now)) {
            match self.identity.set_premium_status(user.id, false, None).await {
                Ok(()) => downgraded += 1,
                Err(e) => tracing::warn!("Failed to expire premium for {}: {}", user.id, e),
            }
        }

        if downgraded > 0 {
            tracing::info!("Expired premium for {} of {} users", downgraded, premium.len());
        }
        Ok(downgraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::models::User;
    use crate::services::MemoryStore;
    use chrono::Duration;

    #[tokio::test]
    async fn test_subscribe_requires_future_expiry() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let service = PremiumService::new(store.clone(), clock.clone());
        let user = User::free(UserId::new());
        store.upsert_user(&user).await.unwrap();

        let err = service
            .subscribe(user.id, clock.now() - Duration::minutes(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        service.subscribe(user.id, clock.now() + Duration::days(30)).await.unwrap();
        assert!(store.get_user(user.id).await.unwrap().unwrap().is_premium);
    }

    #[tokio::test]
    async fn test_subscribe_unknown_user() {
        let service = PremiumService::new(Arc::new(MemoryStore::new()), Arc::new(FixedClock::new(Utc::now())));
        let err = service
            .subscribe(UserId::new(), Utc::now() + Duration::days(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_expire_lapsed_only_touches_expired() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let service = PremiumService::new(store.clone(), clock.clone());

        let lapsed = User::premium(UserId::new(), clock.now() - Duration::hours(1));
        let active = User::premium(UserId::new(), clock.now() + Duration::days(5));
        store.upsert_user(&lapsed).await.unwrap();
        store.upsert_user(&active).await.unwrap();

        assert_eq!(service.expire_lapsed().await.unwrap(), 1);

        let lapsed = store.get_user(lapsed.id).await.unwrap().unwrap();
        assert!(!lapsed.is_premium);
        assert_eq!(lapsed.premium_expires_at, None);
        assert!(store.get_user(active.id).await.unwrap().unwrap().is_premium);
    }
}
