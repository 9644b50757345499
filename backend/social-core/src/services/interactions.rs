//! Interaction manager - like toggling and comment add/remove on posts
//!
//! The toggle decision is a read followed by an atomic store-level set
//! operation, never a read-modify-rewrite of the whole document. A racing
//! duplicate decision degrades to one extra no-op toggle; the store
//! primitive keeps the at-most-once like invariant either way.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Comment, PostView};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{PostStore, UserStore};
use crate::services::project_post;

#[derive(Validate)]
struct CommentInput {
    #[validate(length(min = 1, max = 1000, message = "comment text must be 1 to 1000 characters"))]
    text: String,
}

pub struct InteractionService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
}

impl InteractionService {
    pub fn new(users: Arc<dyn UserStore>, posts: Arc<dyn PostStore>) -> Self {
        Self { users, posts }
    }

    /// Flip `user_id`'s membership in the post's like set and return the
    /// post state after the mutation.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<PostView> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("post {post_id}")))?;

        let updated = if post.likes.contains(&user_id) {
            self.posts.remove_like(post_id, user_id).await?
        } else {
            self.posts.add_like(post_id, user_id).await?
        }
        .ok_or_else(|| ServiceError::NotFound(format!("post {post_id}")))?;

        debug!(%post_id, %user_id, likes = updated.likes.len(), "like toggled");
        project_post(self.users.as_ref(), updated).await
    }

    /// Append a comment and return the updated, author-resolved post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> ServiceResult<PostView> {
        let input = CommentInput {
            text: text.trim().to_string(),
        };
        input.validate()?;

        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("user {user_id}")));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            posted_by: user_id,
            text: input.text,
            created_at: Utc::now(),
        };

        let updated = self
            .posts
            .push_comment(post_id, &comment)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("post {post_id}")))?;

        debug!(%post_id, comment_id = %comment.id, "comment added");
        project_post(self.users.as_ref(), updated).await
    }

    /// Pull the comment with the given id and return the updated post.
    pub async fn remove_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> ServiceResult<PostView> {
        let updated = self
            .posts
            .pull_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("post {post_id}")))?;

        debug!(%post_id, %comment_id, "comment removed");
        project_post(self.users.as_ref(), updated).await
    }
}
