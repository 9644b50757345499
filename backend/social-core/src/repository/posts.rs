use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::PostStore;

const POST_COLUMNS: &str =
    "id, posted_by, image, caption, likes, comments, created_at, updated_at";

/// Row shape for the posts table; `comments` is a jsonb column
#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    posted_by: Uuid,
    image: Option<String>,
    caption: String,
    likes: Vec<Uuid>,
    comments: Json<Vec<Comment>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            posted_by: row.posted_by,
            image: row.image,
            caption: row.caption,
            likes: row.likes,
            comments: row.comments.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL adapter for the posts collection
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostStore for PgPostStore {
    async fn create_post(
        &self,
        posted_by: Uuid,
        caption: &str,
        image: Option<&str>,
    ) -> ServiceResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (id, posted_by, caption, image)
            VALUES ($1, $2, $3, $4)
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(posted_by)
        .bind(caption)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;

        debug!(post_id = %row.id, %posted_by, "created post");
        Ok(row.into())
    }

    async fn get_post(&self, id: Uuid) -> ServiceResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_authors(&self, authors: &[Uuid]) -> ServiceResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE posted_by = ANY($1)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(authors)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_post(&self, id: Uuid) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!(post_id = %id, "deleted post");
        }
        Ok(deleted)
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<Option<Post>> {
        // Conditional append keeps the at-most-once invariant even when two
        // togglers race on the same (post, user) pair.
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET likes = CASE WHEN $2 = ANY(likes) THEN likes ELSE array_append(likes, $2) END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET likes = array_remove(likes, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn push_comment(&self, post_id: Uuid, comment: &Comment) -> ServiceResult<Option<Post>> {
        let payload = serde_json::to_value(comment)
            .map_err(|e| ServiceError::Internal(format!("comment serialization failed: {e}")))?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET comments = comments || $2::jsonb, updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(post_id)
        .bind(payload)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> ServiceResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET comments = COALESCE(
                    (SELECT jsonb_agg(c)
                     FROM jsonb_array_elements(comments) AS c
                     WHERE c->>'id' <> $2),
                    '[]'::jsonb
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(post_id)
        .bind(comment_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
