//! In-memory store implementations for integration tests
//!
//! Provide the same CRUD + atomic-list-mutation contract as the Postgres
//! adapters without requiring a database, plus a failure-injecting wrapper
//! for exercising the partial-failure path of the relationship manager.

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use social_core::domain::{Comment, Post, User, UserRef, UserSummary};
use social_core::error::{ServiceError, ServiceResult};
use social_core::repository::{PostStore, UserStore};

/// In-memory users collection
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read for assertions, bypassing the trait
    pub fn snapshot(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, name: &str, email: &str) -> ServiceResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: None,
            following: vec![],
            followers: vec![],
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> ServiceResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_summaries(&self) -> ServiceResult<Vec<UserSummary>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .map(|u| UserSummary {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                created_at: u.created_at,
                updated_at: u.updated_at,
            })
            .collect())
    }

    async fn list_refs_excluding(&self, exclude: &[Uuid]) -> ServiceResult<Vec<UserRef>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| !exclude.contains(&u.id))
            .map(user_ref)
            .collect())
    }

    async fn get_refs(&self, ids: &[Uuid]) -> ServiceResult<Vec<UserRef>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| ids.contains(&u.id))
            .map(user_ref)
            .collect())
    }

    async fn update_name(&self, id: Uuid, name: &str) -> ServiceResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(&id).map(|u| {
            u.name = name.to_string();
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn set_avatar(&self, id: Uuid, path: &str) -> ServiceResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(&id).map(|u| {
            u.avatar = Some(path.to_string());
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(self.users.lock().unwrap().remove(&id).is_some())
    }

    async fn push_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        Ok(self.mutate(id, |u| {
            if !u.following.contains(&target) {
                u.following.push(target);
            }
        }))
    }

    async fn pull_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        Ok(self.mutate(id, |u| u.following.retain(|x| *x != target)))
    }

    async fn push_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        Ok(self.mutate(id, |u| {
            if !u.followers.contains(&target) {
                u.followers.push(target);
            }
        }))
    }

    async fn pull_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        Ok(self.mutate(id, |u| u.followers.retain(|x| *x != target)))
    }
}

impl MemoryUserStore {
    fn mutate(&self, id: Uuid, f: impl FnOnce(&mut User)) -> bool {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                f(user);
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id,
        name: user.name.clone(),
        avatar: user.avatar.clone(),
    }
}

/// In-memory posts collection
#[derive(Clone, Default)]
pub struct MemoryPostStore {
    posts: Arc<Mutex<HashMap<Uuid, Post>>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post with an explicit creation time, for ordering tests
    pub fn insert_post_at(&self, posted_by: Uuid, caption: &str, created_at: DateTime<Utc>) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            posted_by,
            image: None,
            caption: caption.to_string(),
            likes: vec![],
            comments: vec![],
            created_at,
            updated_at: created_at,
        };
        self.posts.lock().unwrap().insert(post.id, post.clone());
        post
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }

    fn mutate(&self, id: Uuid, f: impl FnOnce(&mut Post)) -> Option<Post> {
        let mut posts = self.posts.lock().unwrap();
        posts.get_mut(&id).map(|post| {
            f(post);
            post.updated_at = Utc::now();
            post.clone()
        })
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryPostStore {
    async fn create_post(
        &self,
        posted_by: Uuid,
        caption: &str,
        image: Option<&str>,
    ) -> ServiceResult<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            posted_by,
            image: image.map(str::to_string),
            caption: caption.to_string(),
            likes: vec![],
            comments: vec![],
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> ServiceResult<Option<Post>> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_authors(&self, authors: &[Uuid]) -> ServiceResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .values()
            .filter(|p| authors.contains(&p.posted_by))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn delete_post(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(self.posts.lock().unwrap().remove(&id).is_some())
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<Option<Post>> {
        Ok(self.mutate(post_id, |p| {
            if !p.likes.contains(&user_id) {
                p.likes.push(user_id);
            }
        }))
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<Option<Post>> {
        Ok(self.mutate(post_id, |p| p.likes.retain(|x| *x != user_id)))
    }

    async fn push_comment(&self, post_id: Uuid, comment: &Comment) -> ServiceResult<Option<Post>> {
        Ok(self.mutate(post_id, |p| p.comments.push(comment.clone())))
    }

    async fn pull_comment(&self, post_id: Uuid, comment_id: Uuid) -> ServiceResult<Option<Post>> {
        Ok(self.mutate(post_id, |p| p.comments.retain(|c| c.id != comment_id)))
    }
}

/// Wrapper that fails the next followers-list write, for exercising the
/// asymmetric-relationship path
#[derive(Clone)]
pub struct FlakyUserStore {
    inner: MemoryUserStore,
    fail_next_follower_write: Arc<AtomicBool>,
}

impl FlakyUserStore {
    pub fn new(inner: MemoryUserStore) -> Self {
        Self {
            inner,
            fail_next_follower_write: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_next_follower_write(&self) {
        self.fail_next_follower_write.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.fail_next_follower_write.swap(false, Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UserStore for FlakyUserStore {
    async fn create_user(&self, name: &str, email: &str) -> ServiceResult<User> {
        self.inner.create_user(name, email).await
    }

    async fn get_user(&self, id: Uuid) -> ServiceResult<Option<User>> {
        self.inner.get_user(id).await
    }

    async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn list_summaries(&self) -> ServiceResult<Vec<UserSummary>> {
        self.inner.list_summaries().await
    }

    async fn list_refs_excluding(&self, exclude: &[Uuid]) -> ServiceResult<Vec<UserRef>> {
        self.inner.list_refs_excluding(exclude).await
    }

    async fn get_refs(&self, ids: &[Uuid]) -> ServiceResult<Vec<UserRef>> {
        self.inner.get_refs(ids).await
    }

    async fn update_name(&self, id: Uuid, name: &str) -> ServiceResult<Option<User>> {
        self.inner.update_name(id, name).await
    }

    async fn set_avatar(&self, id: Uuid, path: &str) -> ServiceResult<Option<User>> {
        self.inner.set_avatar(id, path).await
    }

    async fn delete_user(&self, id: Uuid) -> ServiceResult<bool> {
        self.inner.delete_user(id).await
    }

    async fn push_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        self.inner.push_following(id, target).await
    }

    async fn pull_following(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        self.inner.pull_following(id, target).await
    }

    async fn push_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        if self.take_failure() {
            return Err(ServiceError::Internal(
                "injected follower write failure".to_string(),
            ));
        }
        self.inner.push_follower(id, target).await
    }

    async fn pull_follower(&self, id: Uuid, target: Uuid) -> ServiceResult<bool> {
        if self.take_failure() {
            return Err(ServiceError::Internal(
                "injected follower write failure".to_string(),
            ));
        }
        self.inner.pull_follower(id, target).await
    }
}

/// Stagger creation times so ordering assertions never depend on clock
/// resolution
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}
