use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{User, UserRef, UserSummary};
use crate::error::ServiceResult;
use crate::repository::UserStore;

const USER_COLUMNS: &str =
    "id, name, email, avatar, following, followers, created_at, updated_at";

/// PostgreSQL adapter for the users collection
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conditional single-statement append: a present entry leaves the list
    /// untouched, so re-follow stays a no-op on final state.
    async fn push(&self, column: &str, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        let query = format!(
            r#"
            UPDATE users
            SET {col} = CASE WHEN $2 = ANY({col}) THEN {col} ELSE array_append({col}, $2) END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
            col = column,
        );

        let updated: Option<(Uuid,)> = sqlx::query_as(&query)
            .bind(id)
            .bind(target)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated.is_some())
    }

    async fn pull(&self, column: &str, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        let query = format!(
            r#"
            UPDATE users
            SET {col} = array_remove({col}, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
            col = column,
        );

        let updated: Option<(Uuid,)> = sqlx::query_as(&query)
            .bind(id)
            .bind(target)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated.is_some())
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, name: &str, email: &str) -> ServiceResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = %user.id, "created user");
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_summaries(&self) -> ServiceResult<Vec<UserSummary>> {
        let summaries = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, created_at, updated_at FROM users",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn list_refs_excluding(&self, exclude: &[Uuid]) -> ServiceResult<Vec<UserRef>> {
        let refs = sqlx::query_as::<_, UserRef>(
            "SELECT id, name, avatar FROM users WHERE id <> ALL($1)",
        )
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        Ok(refs)
    }

    async fn get_refs(&self, ids: &[Uuid]) -> ServiceResult<Vec<UserRef>> {
        let refs = sqlx::query_as::<_, UserRef>(
            "SELECT id, name, avatar FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(refs)
    }

    async fn update_name(&self, id: Uuid, name: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_avatar(&self, id: Uuid, path: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET avatar = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!(user_id = %id, "deleted user");
        }
        Ok(deleted)
    }

    async fn push_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        self.push("following", id, target).await
    }

    async fn pull_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        self.pull("following", id, target).await
    }

    async fn push_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        self.push("followers", id, target).await
    }

    async fn pull_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        self.pull("followers", id, target).await
    }
}
