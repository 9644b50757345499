//! Managers orchestrating the store adapters. Each service receives its
//! adapters (and, where relevant, the image pipeline) at construction.

pub mod accounts;
pub mod feed;
pub mod interactions;
pub mod posts;
pub mod relationships;

pub use accounts::AccountService;
pub use feed::FeedService;
pub use interactions::InteractionService;
pub use posts::PostService;
pub use relationships::RelationshipService;

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{Post, PostView, UserRef};
use crate::error::ServiceResult;
use crate::repository::UserStore;

/// Resolve every author a post view needs and project it.
pub(crate) async fn project_post(users: &dyn UserStore, post: Post) -> ServiceResult<PostView> {
    let ids = PostView::author_ids(&post);
    let refs = users.get_refs(&ids).await?;
    let map: HashMap<Uuid, UserRef> = refs.into_iter().map(|r| (r.id, r)).collect();
    Ok(PostView::project(post, &map))
}
