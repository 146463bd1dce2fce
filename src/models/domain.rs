use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Raised when an identifier string is not a valid UUID
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} id: {value:?}")]
pub struct IdError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an id received across the service boundary
            pub fn parse(value: &str) -> Result<Self, IdError> {
                value.parse()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| IdError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

opaque_id!(
    /// Account identifier owned by the identity store
    UserId,
    "user"
);
opaque_id!(ProfileId, "profile");
opaque_id!(SwipeId, "swipe");
opaque_id!(
    /// Shared by both rows of a match; also the room id used by messages
    MatchId,
    "match room"
);
opaque_id!(MessageId, "message");

/// Account as seen by the matching core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "isPremium")]
    pub is_premium: bool,
    #[serde(rename = "premiumExpiresAt", default)]
    pub premium_expires_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn free(id: UserId) -> Self {
        Self {
            id,
            is_premium: false,
            premium_expires_at: None,
        }
    }

    pub fn premium(id: UserId, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            is_premium: true,
            premium_expires_at: Some(expires_at),
        }
    }

    /// True when the stored flag is set but the expiry has already passed.
    /// The sweep clears these; discovery still honours the flag until then.
    pub fn premium_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.is_premium && self.premium_expires_at.map_or(true, |at| at < now)
    }
}

/// Display data shown during discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// One directional decision. Never updated; a new decision is a new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    pub id: SwipeId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "targetUserId")]
    pub target_user_id: UserId,
    pub liked: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// One side of a match. A match is always stored as two rooms with the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRoom {
    pub id: MatchId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "targetUserId")]
    pub target_user_id: UserId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl MatchRoom {
    /// Build both sides of a match sharing `id`
    pub fn pair(id: MatchId, a: UserId, b: UserId, created_at: DateTime<Utc>) -> [MatchRoom; 2] {
        [
            MatchRoom {
                id,
                user_id: a,
                target_user_id: b,
                created_at,
            },
            MatchRoom {
                id,
                user_id: b,
                target_user_id: a,
                created_at,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(rename = "matchRoomId")]
    pub match_room_id: MatchId,
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Payload pushed to the notification sink for every stored message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessageEvent {
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    pub content: String,
}

/// How discovery treats existing match rooms when building the exclusion set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchExclusion {
    /// Only rooms created on the current calendar day
    Today,
    /// Every room the user still holds
    #[default]
    AllRooms,
}

/// Tier limits applied by discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryPolicy {
    pub free_daily_swipe_quota: usize,
    pub free_page_size: usize,
    pub premium_page_size: usize,
    pub match_exclusion: MatchExclusion,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            free_daily_swipe_quota: 10,
            free_page_size: 10,
            premium_page_size: 50,
            match_exclusion: MatchExclusion::AllRooms,
        }
    }
}

impl DiscoveryPolicy {
    pub fn page_size(&self, premium: bool) -> usize {
        if premium {
            self.premium_page_size
        } else {
            self.free_page_size
        }
    }
}
