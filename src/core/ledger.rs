use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::error::CoreError;
use crate::models::{Swipe, SwipeId, UserId};
use crate::services::SwipeStore;

/// Append-only record of directional swipe decisions
#[derive(Clone)]
pub struct SwipeLedger {
    swipes: Arc<dyn SwipeStore>,
    clock: Arc<dyn Clock>,
}

impl SwipeLedger {
    pub fn new(swipes: Arc<dyn SwipeStore>, clock: Arc<dyn Clock>) -> Self {
        Self { swipes, clock }
    }

    /// Persist a new swipe row stamped with the current time
    pub async fn record_swipe(
        &self,
        acting: UserId,
        target: UserId,
        liked: bool,
    ) -> Result<Swipe, CoreError> {
        let swipe = Swipe {
            id: SwipeId::new(),
            user_id: acting,
            target_user_id: target,
            liked,
            created_at: self.clock.now(),
        };

        self.swipes
            .insert_swipe(&swipe)
            .await
            .map_err(CoreError::Persistence)?;

        Ok(swipe)
    }

    /// Latest decision `acting` made about `target`. One direction only.
    pub async fn most_recent_decision(
        &self,
        acting: UserId,
        target: UserId,
    ) -> Result<Option<Swipe>, CoreError> {
        Ok(self.swipes.latest_swipe(acting, target).await?)
    }

    /// Distinct users `acting` swiped on during the calendar day `as_of`
    pub async fn decided_targets_today(
        &self,
        acting: UserId,
        as_of: NaiveDate,
    ) -> Result<HashSet<UserId>, CoreError> {
        let targets = self.swipes.swiped_targets_on(acting, as_of).await?;
        Ok(targets.into_iter().collect())
    }
}
