//! Store adapters: CRUD plus atomic list mutation over User and Post
//! documents.
//!
//! Managers receive adapter instances at construction and never reach the
//! storage engine directly. Every list mutation is a single conditional
//! statement at the store layer, so append/remove stay idempotent and never
//! require the caller to read and rewrite a whole document.

mod posts;
mod users;

pub use posts::PgPostStore;
pub use users::PgUserStore;

use crate::domain::{Comment, Post, User, UserRef, UserSummary};
use crate::error::ServiceResult;
use uuid::Uuid;

/// Adapter over the users collection: CRUD plus atomic mutation of the
/// denormalized `following`/`followers` lists.
///
/// The list operations return `false` when the targeted user document does
/// not exist; they are no-ops with respect to final state when the entry is
/// already present (append) or absent (remove).
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user with empty relationship lists
    async fn create_user(&self, name: &str, email: &str) -> ServiceResult<User>;

    async fn get_user(&self, id: Uuid) -> ServiceResult<Option<User>>;

    /// Lookup by normalized email
    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    /// Administrative projection of every user
    async fn list_summaries(&self) -> ServiceResult<Vec<UserSummary>>;

    /// Author projections for every user except the given ids
    async fn list_refs_excluding(&self, exclude: &[Uuid]) -> ServiceResult<Vec<UserRef>>;

    /// Author projections for the given ids; missing ids are simply absent
    async fn get_refs(&self, ids: &[Uuid]) -> ServiceResult<Vec<UserRef>>;

    /// Rename a user; `None` when the user does not exist
    async fn update_name(&self, id: Uuid, name: &str) -> ServiceResult<Option<User>>;

    /// Store a new avatar path; `None` when the user does not exist
    async fn set_avatar(&self, id: Uuid, path: &str) -> ServiceResult<Option<User>>;

    /// Remove the user document; `false` when it did not exist
    async fn delete_user(&self, id: Uuid) -> ServiceResult<bool>;

    /// Append `target` to `id`'s following list if absent
    async fn push_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool>;

    /// Remove `target` from `id`'s following list
    async fn pull_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool>;

    /// Append `target` to `id`'s followers list if absent
    async fn push_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool>;

    /// Remove `target` from `id`'s followers list
    async fn pull_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool>;
}

/// Adapter over the posts collection: CRUD plus atomic like/comment
/// mutation.
///
/// Mutations return the post state after the write, or `None` when the post
/// does not exist.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(
        &self,
        posted_by: Uuid,
        caption: &str,
        image: Option<&str>,
    ) -> ServiceResult<Post>;

    async fn get_post(&self, id: Uuid) -> ServiceResult<Option<Post>>;

    /// Every post whose author is in `authors`, newest first
    async fn list_by_authors(&self, authors: &[Uuid]) -> ServiceResult<Vec<Post>>;

    /// Remove the post document; `false` when it did not exist
    async fn delete_post(&self, id: Uuid) -> ServiceResult<bool>;

    /// Atomic set-add of `user_id` to the like set (no-op when present)
    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<Option<Post>>;

    /// Atomic set-remove of `user_id` from the like set (no-op when absent)
    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<Option<Post>>;

    /// Atomic append of a comment to the comment list
    async fn push_comment(&self, post_id: Uuid, comment: &Comment) -> ServiceResult<Option<Post>>;

    /// Atomic pull of the comment with the given id
    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> ServiceResult<Option<Post>>;
}
