//! Store ports consumed by the matching core.
//!
//! Each component receives only the ports it needs. Implementations live in
//! [`crate::services::memory`] and [`crate::services::postgres`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{
    MatchId, MatchRoom, Message, NewMessageEvent, Profile, ProfileId, Swipe, User, UserId,
};

/// Errors raised by store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Accounts and premium status
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn upsert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn set_premium_status(
        &self,
        id: UserId,
        is_premium: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    async fn list_premium_users(&self) -> Result<Vec<User>, StoreError>;
}

/// Profile records keyed by owning user
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Up to `limit` profiles whose owner is not in `excluded`, in store order
    async fn fetch_excluding(
        &self,
        excluded: &HashSet<UserId>,
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError>;

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;

    async fn update_profile(&self, profile: &Profile) -> Result<(), StoreError>;
}

/// Append-only swipe rows
#[async_trait]
pub trait SwipeStore: Send + Sync {
    async fn insert_swipe(&self, swipe: &Swipe) -> Result<(), StoreError>;

    /// Newest row for the ordered pair (`user_id`, `target_user_id`)
    async fn latest_swipe(
        &self,
        user_id: UserId,
        target_user_id: UserId,
    ) -> Result<Option<Swipe>, StoreError>;

    /// Targets of every row `user_id` created on `day` (UTC)
    async fn swiped_targets_on(
        &self,
        user_id: UserId,
        day: NaiveDate,
    ) -> Result<Vec<UserId>, StoreError>;
}

/// Match rooms and their message threads
#[async_trait]
pub trait MatchRoomStore: Send + Sync {
    async fn insert_room(&self, room: &MatchRoom) -> Result<(), StoreError>;

    async fn rooms_for_user(&self, user_id: UserId) -> Result<Vec<MatchRoom>, StoreError>;

    /// Targets of rooms held by `user_id`, optionally only those created on `day`
    async fn room_targets(
        &self,
        user_id: UserId,
        day: Option<NaiveDate>,
    ) -> Result<Vec<UserId>, StoreError>;

    /// Returns the number of rows removed
    async fn delete_room(&self, id: MatchId, user_id: UserId) -> Result<u64, StoreError>;

    async fn insert_message(&self, message: &Message) -> Result<(), StoreError>;

    /// Oldest first, insertion order on equal timestamps
    async fn messages_for_room(&self, room_id: MatchId) -> Result<Vec<Message>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Real-time fan-out for new messages. Best effort only.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        event: &str,
        payload: &NewMessageEvent,
    ) -> Result<(), crate::services::NotifierError>;
}

/// Topic a room's messages are published on
pub fn room_topic(room_id: MatchId) -> String {
    format!("chat_room_{}", room_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_topic_format() {
        let id = MatchId::new();
        assert_eq!(room_topic(id), format!("chat_room_{}", id));
    }
}
