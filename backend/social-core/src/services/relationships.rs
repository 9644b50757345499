//! Relationship manager - symmetric follow/unfollow over two user documents
//!
//! The relationship is two independent list writes issued in sequence, not a
//! transaction. When the mirror write fails after the first succeeded, the
//! operation reports `PartialFailure` naming the applied side so operators
//! can reconcile the asymmetric pair; the core never rolls back or hides the
//! gap.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::repository::UserStore;

pub struct RelationshipService {
    users: Arc<dyn UserStore>,
}

impl RelationshipService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Record `follower_id` following `followee_id` on both documents.
    ///
    /// Idempotent: re-following leaves both lists unchanged. Self-follows
    /// are rejected.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> ServiceResult<()> {
        if follower_id == followee_id {
            return Err(ServiceError::Validation(
                "users cannot follow themselves".to_string(),
            ));
        }

        // Both ends must resolve before the first write lands.
        self.require_user(follower_id).await?;
        self.require_user(followee_id).await?;

        if !self.users.push_following(follower_id, followee_id).await? {
            return Err(ServiceError::NotFound(format!("user {follower_id}")));
        }

        match self.users.push_follower(followee_id, follower_id).await {
            Ok(true) => {
                debug!(%follower_id, %followee_id, "follow recorded");
                Ok(())
            }
            Ok(false) => Err(self.asymmetric(
                "following",
                follower_id,
                followee_id,
                ServiceError::NotFound(format!("user {followee_id}")),
            )),
            Err(err) => Err(self.asymmetric("following", follower_id, followee_id, err)),
        }
    }

    /// Remove the relationship from both documents.
    ///
    /// Idempotent: unfollowing an absent relationship is a no-op on final
    /// state.
    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> ServiceResult<()> {
        if !self.users.pull_following(follower_id, followee_id).await? {
            return Err(ServiceError::NotFound(format!("user {follower_id}")));
        }

        match self.users.pull_follower(followee_id, follower_id).await {
            Ok(true) => {
                debug!(%follower_id, %followee_id, "unfollow recorded");
                Ok(())
            }
            Ok(false) => Err(self.asymmetric(
                "following",
                follower_id,
                followee_id,
                ServiceError::NotFound(format!("user {followee_id}")),
            )),
            Err(err) => Err(self.asymmetric("following", follower_id, followee_id, err)),
        }
    }

    async fn require_user(&self, id: Uuid) -> ServiceResult<()> {
        self.users
            .get_user(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))
    }

    fn asymmetric(
        &self,
        applied: &'static str,
        follower_id: Uuid,
        followee_id: Uuid,
        source: ServiceError,
    ) -> ServiceError {
        warn!(
            %follower_id,
            %followee_id,
            applied,
            error = %source,
            "relationship write left asymmetric"
        );
        ServiceError::PartialFailure {
            applied,
            source: Box::new(source),
        }
    }
}
