use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::CoreError;
use crate::core::ledger::SwipeLedger;
use crate::models::{MatchId, MatchRoom, Swipe, UserId};
use crate::services::MatchRoomStore;

/// Result of a successful swipe
///
/// The swipe itself is always durable here. Match formation is reported for
/// logging and tests only; the HTTP layer answers the same way in every case.
#[derive(Debug)]
pub enum SwipeOutcome {
    /// Pass, or a like without a reciprocal like
    Recorded(Swipe),
    /// Reciprocal like found and both rooms written
    Matched { swipe: Swipe, match_id: MatchId },
    /// Reciprocal like found but at least one room write failed
    MatchIncomplete { swipe: Swipe, error: CoreError },
}

impl SwipeOutcome {
    pub fn swipe(&self) -> &Swipe {
        match self {
            SwipeOutcome::Recorded(swipe)
            | SwipeOutcome::Matched { swipe, .. }
            | SwipeOutcome::MatchIncomplete { swipe, .. } => swipe,
        }
    }

    pub fn match_id(&self) -> Option<MatchId> {
        match self {
            SwipeOutcome::Matched { match_id, .. } => Some(*match_id),
            SwipeOutcome::MatchIncomplete {
                error: CoreError::PartialMatchCreation { match_id, .. },
                ..
            } => Some(*match_id),
            _ => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, SwipeOutcome::Matched { .. })
    }
}

/// Records swipes and turns mutual likes into match room pairs
///
/// Per ordered pair the decision history only grows: a later swipe adds a
/// row, it never edits or undoes an earlier one. Two users liking each other
/// at the same instant may each observe the other's like and both create a
/// room pair; those duplicates are not reconciled here.
#[derive(Clone)]
pub struct MatchEngine {
    ledger: SwipeLedger,
    rooms: Arc<dyn MatchRoomStore>,
    clock: Arc<dyn Clock>,
}

impl MatchEngine {
    pub fn new(ledger: SwipeLedger, rooms: Arc<dyn MatchRoomStore>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, rooms, clock }
    }

    pub async fn swipe(
        &self,
        acting: UserId,
        target: UserId,
        liked: bool,
    ) -> Result<SwipeOutcome, CoreError> {
        if acting == target {
            return Err(CoreError::Validation("users cannot swipe on themselves".to_string()));
        }

        let swipe = self.ledger.record_swipe(acting, target, liked).await?;

        if !liked {
            return Ok(SwipeOutcome::Recorded(swipe));
        }

        // did the target already like us?
        let reciprocal = match self.ledger.most_recent_decision(target, acting).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(
                    "Reciprocity lookup failed for {} -> {}, treating as no match: {}",
                    target,
                    acting,
                    e
                );
                None
            }
        };

        match reciprocal {
            Some(previous) if previous.liked => {
                let match_id = MatchId::new();
                match self.create_pair(match_id, acting, target).await {
                    Ok(()) => {
                        tracing::info!("Match {} formed between {} and {}", match_id, acting, target);
                        Ok(SwipeOutcome::Matched { swipe, match_id })
                    }
                    Err(error) => {
                        tracing::error!("Swipe {} recorded but {}", swipe.id, error);
                        Ok(SwipeOutcome::MatchIncomplete { swipe, error })
                    }
                }
            }
            _ => Ok(SwipeOutcome::Recorded(swipe)),
        }
    }

    /// Write both rooms of a match. Both writes are attempted; the first
    /// failure is reported.
    async fn create_pair(
        &self,
        match_id: MatchId,
        acting: UserId,
        target: UserId,
    ) -> Result<(), CoreError> {
        let mut first_error = None;

        for room in MatchRoom::pair(match_id, acting, target, self.clock.now()) {
            if let Err(e) = self.rooms.insert_room(&room).await {
                tracing::warn!(
                    "Failed to create room {} for {} -> {}: {}",
                    match_id,
                    room.user_id,
                    room.target_user_id,
                    e
                );
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => Ok(()),
            Some(source) => Err(CoreError::PartialMatchCreation { match_id, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::SystemClock;
    use crate::services::MemoryStore;

    fn engine() -> (MatchEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ledger = SwipeLedger::new(store.clone(), clock.clone());
        (MatchEngine::new(ledger, store.clone(), clock), store)
    }

    #[tokio::test]
    async fn test_one_sided_like_records_without_match() {
        let (engine, store) = engine();
        let (a, b) = (UserId::new(), UserId::new());

        let outcome = engine.swipe(a, b, true).await.unwrap();

        assert!(matches!(outcome, SwipeOutcome::Recorded(_)));
        assert_eq!(store.swipe_count(), 1);
        assert_eq!(store.room_count(), 0);
    }

    #[tokio::test]
    async fn test_mutual_like_creates_room_pair() {
        let (engine, store) = engine();
        let (a, b) = (UserId::new(), UserId::new());

        engine.swipe(a, b, true).await.unwrap();
        let outcome = engine.swipe(b, a, true).await.unwrap();

        assert!(outcome.is_match());
        let match_id = outcome.match_id().unwrap();

        let a_rooms = store.rooms_for_user(a).await.unwrap();
        let b_rooms = store.rooms_for_user(b).await.unwrap();
        assert_eq!(a_rooms.len(), 1);
        assert_eq!(b_rooms.len(), 1);
        assert_eq!(a_rooms[0].id, match_id);
        assert_eq!(b_rooms[0].id, match_id);
        assert_eq!(a_rooms[0].target_user_id, b);
        assert_eq!(b_rooms[0].target_user_id, a);
    }

    #[tokio::test]
    async fn test_like_after_pass_does_not_match() {
        let (engine, store) = engine();
        let (a, b) = (UserId::new(), UserId::new());

        engine.swipe(a, b, true).await.unwrap();
        let outcome = engine.swipe(b, a, false).await.unwrap();

        assert!(!outcome.is_match());
        assert_eq!(store.room_count(), 0);
    }

    #[tokio::test]
    async fn test_self_swipe_rejected() {
        let (engine, store) = engine();
        let me = UserId::new();

        let err = engine.swipe(me, me, true).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(store.swipe_count(), 0);
    }
}
