use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// User entity - one account document with denormalized relationship lists.
///
/// `following` keeps insertion order (follow order); neither list holds
/// duplicates, and a user never appears in its own lists. The password
/// credential is owned by the authentication collaborator and is not part of
/// this model.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored normalized (trimmed, lowercase); unique across users
    pub email: String,
    pub avatar: Option<String>,
    pub following: Vec<Uuid>,
    pub followers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post entity - an image post with embedded likes and comments.
///
/// `likes` has set semantics (a user id appears at most once); `comments`
/// keeps creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub image: Option<String>,
    pub caption: String,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment - owned by its parent post, no independent lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Author projection exposed on posts, comments, and the discovery list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

impl UserRef {
    /// Placeholder for an author whose account no longer resolves; dangling
    /// references survive account deletion (cleanup is a reconciliation
    /// concern, not ours).
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: "unknown".to_string(),
            avatar: None,
        }
    }
}

/// Administrative listing projection; never exposes credentials or
/// relationship lists
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post with authors resolved for direct client consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub posted_by: UserRef,
    pub image: Option<String>,
    pub caption: String,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment with its author resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub posted_by: UserRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    /// Project a post against a map of resolved authors. Ids missing from
    /// the map fall back to [`UserRef::unknown`].
    pub fn project(post: Post, refs: &HashMap<Uuid, UserRef>) -> Self {
        let resolve =
            |id: Uuid| -> UserRef { refs.get(&id).cloned().unwrap_or_else(|| UserRef::unknown(id)) };

        Self {
            id: post.id,
            posted_by: resolve(post.posted_by),
            image: post.image,
            caption: post.caption,
            likes: post.likes,
            comments: post
                .comments
                .into_iter()
                .map(|c| CommentView {
                    id: c.id,
                    posted_by: resolve(c.posted_by),
                    text: c.text,
                    created_at: c.created_at,
                })
                .collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    /// Every distinct author id a projection of `post` needs resolved
    pub fn author_ids(post: &Post) -> Vec<Uuid> {
        let mut ids = vec![post.posted_by];
        for comment in &post.comments {
            if !ids.contains(&comment.posted_by) {
                ids.push(comment.posted_by);
            }
        }
        ids
    }
}
