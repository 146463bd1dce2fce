use std::sync::Arc;
use validator::Validate;

use crate::core::clock::Clock;
use crate::core::error::CoreError;
use crate::models::{NewProfile, Profile, ProfileId, ProfileUpdate, UserId};
use crate::services::ProfileStore;

/// Create, read and owner-only update of profiles
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }

    pub async fn create_profile(&self, user: UserId, input: NewProfile) -> Result<Profile, CoreError> {
        input.validate()?;

        let now = self.clock.now();
        let profile = Profile {
            id: ProfileId::new(),
            user_id: user,
            name: input.name.trim().to_string(),
            bio: input.bio,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        };

        self.profiles
            .insert_profile(&profile)
            .await
            .map_err(CoreError::Persistence)?;

        tracing::debug!("Created profile {} for {}", profile.id, user);
        Ok(profile)
    }

    pub async fn get_profile(&self, id: ProfileId) -> Result<Profile, CoreError> {
        self.profiles
            .get_profile(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("profile {}", id)))
    }

    pub async fn update_profile(
        &self,
        id: ProfileId,
        editor: UserId,
        changes: ProfileUpdate,
    ) -> Result<Profile, CoreError> {
        changes.validate()?;

        let mut profile = self.get_profile(id).await?;
        if profile.user_id != editor {
            return Err(CoreError::Forbidden(format!(
                "profile {} belongs to another user",
                id
            )));
        }

        if let Some(name) = changes.name {
            profile.name = name.trim().to_string();
        }
        if let Some(bio) = changes.bio {
            profile.bio = bio;
        }
        if changes.image_url.is_some() {
            profile.image_url = changes.image_url;
        }
        profile.updated_at = self.clock.now();

        self.profiles.update_profile(&profile).await?;
        Ok(profile)
    }
}
