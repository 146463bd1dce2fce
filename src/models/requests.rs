use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to record a swipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    #[serde(default)]
    pub liked: bool,
}

/// Query string carrying the acting user for room endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to post a message into a match room
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "sender_id", alias = "user_id", rename = "senderId")]
    pub sender_id: String,
    #[serde(default)]
    pub content: String,
}

/// Profile fields supplied on creation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProfile {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub bio: String,
    #[validate(length(max = 2048))]
    #[serde(alias = "image_url", rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub bio: Option<String>,
    #[validate(length(max = 2048))]
    #[serde(alias = "image_url", rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

/// Request to create a profile for a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(nested)]
    #[serde(flatten)]
    pub profile: NewProfile,
}

/// Request to update a profile on behalf of its owner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(nested)]
    #[serde(flatten)]
    pub changes: ProfileUpdate,
}

/// Request to activate a premium subscription
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscribePremiumRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "expires_at", rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}
