//! Account manager - user lifecycle around the auth collaborator
//!
//! Credentials never pass through here; the authentication service owns
//! them. This service owns the user document itself: creation with
//! validation, profile updates, avatar ingestion, and self-delete.

use std::sync::Arc;

use bytes::Bytes;
use media_ingest::{ImageCategory, ImagePipeline, IngestRequest};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::config::MediaConfig;
use crate::domain::User;
use crate::error::{ServiceError, ServiceResult};
use crate::repository::UserStore;

#[derive(Validate)]
struct SignupInput {
    #[validate(length(min = 4, max = 10, message = "name must be between 4 and 10 characters"))]
    name: String,
    #[validate(email(message = "enter a valid email"))]
    email: String,
}

#[derive(Validate)]
struct NameInput {
    #[validate(length(min = 4, max = 10, message = "name must be between 4 and 10 characters"))]
    name: String,
}

pub struct AccountService {
    users: Arc<dyn UserStore>,
    pipeline: Arc<ImagePipeline>,
    avatar_width: u32,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, pipeline: Arc<ImagePipeline>, media: &MediaConfig) -> Self {
        Self {
            users,
            pipeline,
            avatar_width: media.avatar_width,
        }
    }

    /// Create a user document with empty relationship lists. The email is
    /// normalized before the uniqueness check and storage.
    pub async fn create_user(&self, name: &str, email: &str) -> ServiceResult<User> {
        let input = SignupInput {
            name: name.trim().to_string(),
            email: normalize_email(email),
        };
        input.validate()?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Validation(
                "email is already registered".to_string(),
            ));
        }

        let user = self.users.create_user(&input.name, &input.email).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Rename a user. Callers may only update their own profile.
    pub async fn update_profile(
        &self,
        caller: Uuid,
        user_id: Uuid,
        name: &str,
    ) -> ServiceResult<User> {
        self.require_self(caller, user_id)?;

        let input = NameInput {
            name: name.trim().to_string(),
        };
        input.validate()?;

        self.users
            .update_name(user_id, &input.name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))
    }

    /// Ingest a new avatar through the image pipeline and store its path.
    pub async fn set_avatar(
        &self,
        caller: Uuid,
        user_id: Uuid,
        bytes: Bytes,
        declared_mime: &str,
    ) -> ServiceResult<User> {
        self.require_self(caller, user_id)?;

        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))?;

        let stored = self
            .pipeline
            .ingest(IngestRequest {
                bytes,
                declared_mime,
                owner_name: &user.name,
                category: ImageCategory::Avatars,
                target_width: self.avatar_width,
            })
            .await?;

        self.users
            .set_avatar(user_id, &stored.path)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))
    }

    /// Delete a user's own account. Dangling references in other documents
    /// are left to the external reconciliation job.
    pub async fn delete_account(&self, caller: Uuid, user_id: Uuid) -> ServiceResult<()> {
        self.require_self(caller, user_id)?;

        if !self.users.delete_user(user_id).await? {
            return Err(ServiceError::NotFound(format!("user {user_id}")));
        }

        info!(%user_id, "account deleted");
        Ok(())
    }

    /// Fetch one user; a missing id is `NotFound`, never a defaulted entity.
    pub async fn get_user(&self, user_id: Uuid) -> ServiceResult<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))
    }

    fn require_self(&self, caller: Uuid, user_id: Uuid) -> ServiceResult<()> {
        if caller != user_id {
            return Err(ServiceError::Unauthorized(
                "you are not authorized to perform this action".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lowercase + trim, applied before every uniqueness check and store write
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
