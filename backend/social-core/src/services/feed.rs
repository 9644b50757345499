//! Feed composer - the posts a user can see, and who they might follow
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, User, UserRef, UserSummary};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{PostStore, UserStore};

pub struct FeedService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
}

impl FeedService {
    pub fn new(users: Arc<dyn UserStore>, posts: Arc<dyn PostStore>) -> Self {
        Self { users, posts }
    }

    /// Every post by the user or anyone they follow, newest first.
    pub async fn get_feed(&self, user_id: Uuid) -> ServiceResult<Vec<Post>> {
        let user = self.require_user(user_id).await?;
        let authors = feed_authors(&user);
        self.posts.list_by_authors(&authors).await
    }

    /// Every post by a single user, newest first.
    pub async fn get_user_posts(&self, user_id: Uuid) -> ServiceResult<Vec<Post>> {
        self.require_user(user_id).await?;
        self.posts.list_by_authors(&[user_id]).await
    }

    /// Suggestion list: everyone the user does not already follow (and not
    /// the user themselves), projected to id/name/avatar.
    pub async fn get_discoverable(&self, user_id: Uuid) -> ServiceResult<Vec<UserRef>> {
        let user = self.require_user(user_id).await?;
        let exclude = feed_authors(&user);
        self.users.list_refs_excluding(&exclude).await
    }

    /// Administrative listing of every user.
    pub async fn get_user_summaries(&self) -> ServiceResult<Vec<UserSummary>> {
        self.users.list_summaries().await
    }

    async fn require_user(&self, id: Uuid) -> ServiceResult<User> {
        self.users
            .get_user(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))
    }
}

/// `following ∪ {self}`, preserving follow order with self appended last
fn feed_authors(user: &User) -> Vec<Uuid> {
    let mut authors = user.following.clone();
    if !authors.contains(&user.id) {
        authors.push(user.id);
    }
    authors
}
