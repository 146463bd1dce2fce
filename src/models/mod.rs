// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DiscoveryPolicy, IdError, MatchExclusion, MatchId, MatchRoom, Message, MessageId,
    NewMessageEvent, Profile, ProfileId, Swipe, SwipeId, User, UserId,
};
pub use requests::{
    CreateProfileRequest, NewProfile, PostMessageRequest, ProfileUpdate, SubscribePremiumRequest,
    SwipeRequest, UpdateProfileRequest, UserQuery,
};
pub use responses::{DiscoverResponse, ErrorResponse, HealthResponse, SwipeResponse};
