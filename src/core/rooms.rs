use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::CoreError;
use crate::models::{MatchExclusion, MatchId, MatchRoom, Message, MessageId, NewMessageEvent, UserId};
use crate::services::{room_topic, MatchRoomStore, NotificationSink};

/// Event name published for every stored message
pub const NEW_MESSAGE_EVENT: &str = "new_message";

/// Match rooms held by each user and the message thread attached to them
///
/// Room ids supplied with messages are trusted: neither posting nor listing
/// checks that the room exists.
#[derive(Clone)]
pub struct MatchRoomDirectory {
    rooms: Arc<dyn MatchRoomStore>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl MatchRoomDirectory {
    pub fn new(
        rooms: Arc<dyn MatchRoomStore>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            notifier,
            clock,
        }
    }

    pub async fn list_rooms(&self, user: UserId) -> Result<Vec<MatchRoom>, CoreError> {
        Ok(self.rooms.rooms_for_user(user).await?)
    }

    /// Remove `user`'s side of a room. The other side keeps its row.
    /// Deleting a room that does not exist, or belongs to someone else, is a no-op.
    pub async fn delete_room(&self, room_id: MatchId, user: UserId) -> Result<(), CoreError> {
        let removed = self.rooms.delete_room(room_id, user).await?;
        tracing::debug!("Deleted {} room rows for {} in {}", removed, user, room_id);
        Ok(())
    }

    pub async fn post_message(
        &self,
        room_id: MatchId,
        sender: UserId,
        content: &str,
    ) -> Result<Message, CoreError> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation("message content must not be empty".to_string()));
        }

        let message = Message {
            id: MessageId::new(),
            match_room_id: room_id,
            sender_id: sender,
            content: content.to_string(),
            created_at: self.clock.now(),
        };

        self.rooms
            .insert_message(&message)
            .await
            .map_err(CoreError::Persistence)?;

        let event = NewMessageEvent {
            sender_id: sender,
            content: message.content.clone(),
        };
        let topic = room_topic(room_id);
        let notifier = self.notifier.clone();
        let message_id = message.id;
        // fire and forget; the caller never waits on the sink
        tokio::spawn(async move {
            if let Err(e) = notifier.publish(&topic, NEW_MESSAGE_EVENT, &event).await {
                tracing::warn!("Message {} stored but notification on {} failed: {}", message_id, topic, e);
            }
        });

        Ok(message)
    }

    pub async fn list_messages(&self, room_id: MatchId) -> Result<Vec<Message>, CoreError> {
        Ok(self.rooms.messages_for_room(room_id).await?)
    }

    /// Users `user` holds a room with, per the exclusion scope
    pub async fn matched_targets(
        &self,
        user: UserId,
        scope: MatchExclusion,
        today: NaiveDate,
    ) -> Result<HashSet<UserId>, CoreError> {
        let day = match scope {
            MatchExclusion::Today => Some(today),
            MatchExclusion::AllRooms => None,
        };
        let targets = self.rooms.room_targets(user, day).await?;
        Ok(targets.into_iter().collect())
    }

    pub async fn ping(&self) -> Result<(), CoreError> {
        Ok(self.rooms.ping().await?)
    }
}
