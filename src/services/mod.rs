// Service exports
pub mod memory;
pub mod notifier;
pub mod postgres;
pub mod scheduler;
pub mod store;

pub use memory::MemoryStore;
pub use notifier::{LogNotifier, NotifierError, WebhookNotifier};
pub use postgres::PostgresClient;
pub use scheduler::PremiumExpirySweeper;
pub use store::{
    room_topic, IdentityStore, MatchRoomStore, NotificationSink, ProfileStore, StoreError,
    SwipeStore,
};
