//! Post service - image upload, post creation, and post deletion
use std::sync::Arc;

use bytes::Bytes;
use media_ingest::{ImageCategory, ImagePipeline, IngestRequest, StoredImage};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::config::MediaConfig;
use crate::domain::PostView;
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{PostStore, UserStore};
use crate::services::project_post;

#[derive(Validate)]
struct CaptionInput {
    #[validate(length(max = 1000, message = "caption must be at most 1000 characters"))]
    caption: String,
}

pub struct PostService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    pipeline: Arc<ImagePipeline>,
    post_image_width: u32,
}

impl PostService {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        pipeline: Arc<ImagePipeline>,
        media: &MediaConfig,
    ) -> Self {
        Self {
            users,
            posts,
            pipeline,
            post_image_width: media.post_image_width,
        }
    }

    /// Run an upload through the ingestion pipeline on behalf of a user.
    ///
    /// Post creation is a separate step; the returned path is what the
    /// client hands back in `create_post`.
    pub async fn upload_image(
        &self,
        user_id: Uuid,
        bytes: Bytes,
        declared_mime: &str,
    ) -> ServiceResult<StoredImage> {
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
                category: ImageCategory::Uploads,
                target_width: self.post_image_width,
            })
            .await?;

        Ok(stored)
    }

    /// Persist a new post and return the author-resolved view.
    pub async fn create_post(
        &self,
        user_id: Uuid,
        caption: &str,
        image: Option<&str>,
    ) -> ServiceResult<PostView> {
        let input = CaptionInput {
            caption: caption.trim().to_string(),
        };
        input.validate()?;
        if input.caption.is_empty() && image.is_none() {
            return Err(ServiceError::Validation(
                "a post needs a caption or an image".to_string(),
            ));
        }

        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("user {user_id}")));
        }

        let post = self
            .posts
            .create_post(user_id, &input.caption, image)
            .await?;

        info!(post_id = %post.id, %user_id, "post created");
        project_post(self.users.as_ref(), post).await
    }

    /// Remove a post document. Only the author may delete it; the ownership
    /// gate runs before any write.
    pub async fn delete_post(&self, caller: Uuid, post_id: Uuid) -> ServiceResult<()> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("post {post_id}")))?;

        if post.posted_by != caller {
            return Err(ServiceError::Unauthorized(
                "only the author may delete a post".to_string(),
            ));
        }

        if !self.posts.delete_post(post_id).await? {
            return Err(ServiceError::NotFound(format!("post {post_id}")));
        }

        info!(%post_id, %caller, "post deleted");
        Ok(())
    }
}
