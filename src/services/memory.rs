//! In-memory store adapter.
//!
//! Implements every store port over `Mutex`-guarded vectors. Used by the
//! `memory` storage backend, the test suites and the benchmarks. Nothing is
//! persisted across restarts.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::models::{MatchId, MatchRoom, Message, Profile, ProfileId, Swipe, User, UserId};
use crate::services::store::{IdentityStore, MatchRoomStore, ProfileStore, StoreError, SwipeStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<UserId, User>>,
    profiles: Mutex<Vec<Profile>>,
    swipes: Mutex<Vec<Swipe>>,
    rooms: Mutex<Vec<MatchRoom>>,
    messages: Mutex<Vec<Message>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a swipe row verbatim, keeping its timestamp. Used to seed history.
    pub fn push_swipe(&self, swipe: Swipe) -> Result<(), StoreError> {
        lock(&self.swipes)?.push(swipe);
        Ok(())
    }

    pub fn swipe_count(&self) -> usize {
        self.swipes.lock().map(|s| s.len()).unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or_default()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users)?.get(&id).cloned())
    }

    async fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        lock(&self.users)?.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_premium_status(
        &self,
        id: UserId,
        is_premium: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut users = lock(&self.users)?;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        user.is_premium = is_premium;
        user.premium_expires_at = expires_at;
        Ok(())
    }

    async fn list_premium_users(&self) -> Result<Vec<User>, StoreError> {
        let mut premium: Vec<User> = lock(&self.users)?
            .values()
            .filter(|u| u.is_premium)
            .cloned()
            .collect();
        premium.sort_by_key(|u| u.id);
        Ok(premium)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn fetch_excluding(
        &self,
        excluded: &HashSet<UserId>,
        limit: usize,
    ) -> Result<Vec<Profile>, StoreError> {
        Ok(lock(&self.profiles)?
            .iter()
            .filter(|p| !excluded.contains(&p.user_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        lock(&self.profiles)?.push(profile.clone());
        Ok(())
    }

    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(lock(&self.profiles)?.iter().find(|p| p.id == id).cloned())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut profiles = lock(&self.profiles)?;
        let existing = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", profile.id)))?;
        *existing = profile.clone();
        Ok(())
    }
}

#[async_trait]
impl SwipeStore for MemoryStore {
    async fn insert_swipe(&self, swipe: &Swipe) -> Result<(), StoreError> {
        lock(&self.swipes)?.push(swipe.clone());
        Ok(())
    }

    async fn latest_swipe(
        &self,
        user_id: UserId,
        target_user_id: UserId,
    ) -> Result<Option<Swipe>, StoreError> {
        let swipes = lock(&self.swipes)?;
        // later insertions win ties on created_at
        let latest = swipes
            .iter()
            .filter(|s| s.user_id == user_id && s.target_user_id == target_user_id)
            .fold(None::<&Swipe>, |best, s| match best {
                Some(b) if b.created_at > s.created_at => Some(b),
                _ => Some(s),
            });
        Ok(latest.cloned())
    }

    async fn swiped_targets_on(
        &self,
        user_id: UserId,
        day: NaiveDate,
    ) -> Result<Vec<UserId>, StoreError> {
        Ok(lock(&self.swipes)?
            .iter()
            .filter(|s| s.user_id == user_id && s.created_at.date_naive() == day)
            .map(|s| s.target_user_id)
            .collect())
    }
}

#[async_trait]
impl MatchRoomStore for MemoryStore {
    async fn insert_room(&self, room: &MatchRoom) -> Result<(), StoreError> {
        lock(&self.rooms)?.push(room.clone());
        Ok(())
    }

    async fn rooms_for_user(&self, user_id: UserId) -> Result<Vec<MatchRoom>, StoreError> {
        Ok(lock(&self.rooms)?
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn room_targets(
        &self,
        user_id: UserId,
        day: Option<NaiveDate>,
    ) -> Result<Vec<UserId>, StoreError> {
        Ok(lock(&self.rooms)?
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| day.map_or(true, |d| r.created_at.date_naive() == d))
            .map(|r| r.target_user_id)
            .collect())
    }

    async fn delete_room(&self, id: MatchId, user_id: UserId) -> Result<u64, StoreError> {
        let mut rooms = lock(&self.rooms)?;
        let before = rooms.len();
        rooms.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok((before - rooms.len()) as u64)
    }

    async fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
        lock(&self.messages)?.push(message.clone());
        Ok(())
    }

    async fn messages_for_room(&self, room_id: MatchId) -> Result<Vec<Message>, StoreError> {
        let mut thread: Vec<Message> = lock(&self.messages)?
            .iter()
            .filter(|m| m.match_room_id == room_id)
            .cloned()
            .collect();
        // stable sort keeps insertion order for equal timestamps
        thread.sort_by_key(|m| m.created_at);
        Ok(thread)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        lock(&self.rooms).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageId, SwipeId};
    use chrono::Duration;

    fn swipe(user: UserId, target: UserId, liked: bool, at: DateTime<Utc>) -> Swipe {
        Swipe {
            id: SwipeId::new(),
            user_id: user,
            target_user_id: target,
            liked,
            created_at: at,
        }
    }

    #[tokio::test]
    async fn test_latest_swipe_prefers_newest_row() {
        let store = MemoryStore::new();
        let (a, b) = (UserId::new(), UserId::new());
        let now = Utc::now();

        store.push_swipe(swipe(a, b, true, now)).unwrap();
        store.push_swipe(swipe(a, b, false, now - Duration::hours(2))).unwrap();

        let latest = store.latest_swipe(a, b).await.unwrap().unwrap();
        assert!(latest.liked);

        // reverse direction is never aggregated
        assert!(store.latest_swipe(b, a).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_swipe_tie_goes_to_last_inserted() {
        let store = MemoryStore::new();
        let (a, b) = (UserId::new(), UserId::new());
        let now = Utc::now();

        store.push_swipe(swipe(a, b, true, now)).unwrap();
        store.push_swipe(swipe(a, b, false, now)).unwrap();

        let latest = store.latest_swipe(a, b).await.unwrap().unwrap();
        assert!(!latest.liked);
    }

    #[tokio::test]
    async fn test_messages_sorted_stably() {
        let store = MemoryStore::new();
        let room = MatchId::new();
        let sender = UserId::new();
        let now = Utc::now();

        for (content, at) in [("b", now), ("c", now), ("a", now - Duration::seconds(5))] {
            store
                .insert_message(&Message {
                    id: MessageId::new(),
                    match_room_id: room,
                    sender_id: sender,
                    content: content.to_string(),
                    created_at: at,
                })
                .await
                .unwrap();
        }

        let thread = store.messages_for_room(room).await.unwrap();
        let contents: Vec<&str> = thread.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_set_premium_status_unknown_user() {
        let store = MemoryStore::new();
        let result = store.set_premium_status(UserId::new(), true, None).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
