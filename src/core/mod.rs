// Core exports
pub mod clock;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod premium;
pub mod profiles;
pub mod rooms;

pub use clock::{Clock, FixedClock, SystemClock};
pub use discovery::DiscoveryEngine;
pub use engine::{MatchEngine, SwipeOutcome};
pub use error::CoreError;
pub use ledger::SwipeLedger;
pub use premium::PremiumService;
pub use profiles::ProfileService;
pub use rooms::{MatchRoomDirectory, NEW_MESSAGE_EVENT};

use std::sync::Arc;

use crate::models::DiscoveryPolicy;
use crate::services::{IdentityStore, MatchRoomStore, NotificationSink, ProfileStore, SwipeStore};

/// Store handles the core is wired from
#[derive(Clone)]
pub struct Stores {
    pub identity: Arc<dyn IdentityStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub swipes: Arc<dyn SwipeStore>,
    pub rooms: Arc<dyn MatchRoomStore>,
}

impl Stores {
    /// Use one adapter for every port
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: IdentityStore + ProfileStore + SwipeStore + MatchRoomStore + 'static,
    {
        Self {
            identity: store.clone(),
            profiles: store.clone(),
            swipes: store.clone(),
            rooms: store,
        }
    }
}

/// Every core component, wired with explicit dependencies
#[derive(Clone)]
pub struct MatchCore {
    pub engine: MatchEngine,
    pub discovery: DiscoveryEngine,
    pub rooms: MatchRoomDirectory,
    pub profiles: ProfileService,
    pub premium: PremiumService,
}

impl MatchCore {
    pub fn new(
        stores: Stores,
        notifier: Arc<dyn NotificationSink>,
        policy: DiscoveryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ledger = SwipeLedger::new(stores.swipes.clone(), clock.clone());
        let rooms = MatchRoomDirectory::new(stores.rooms.clone(), notifier, clock.clone());
        let engine = MatchEngine::new(ledger.clone(), stores.rooms.clone(), clock.clone());
        let discovery = DiscoveryEngine::new(
            stores.identity.clone(),
            stores.profiles.clone(),
            ledger,
            rooms.clone(),
            policy,
            clock.clone(),
        );
        let profiles = ProfileService::new(stores.profiles, clock.clone());
        let premium = PremiumService::new(stores.identity, clock);

        Self {
            engine,
            discovery,
            rooms,
            profiles,
            premium,
        }
    }
}
