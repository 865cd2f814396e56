use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{NewPost, NewUser, Post, PostChanges, User};

/// Errors surfaced by any [`PostStore`] backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("user {0} does not exist")]
    UnknownUser(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn post_not_found() -> Self {
        StoreError::NotFound("Post")
    }

    pub fn user_not_found() -> Self {
        StoreError::NotFound("User")
    }
}

/// Persistence for users and posts.
///
/// Post ids are assigned by the store and increase in creation order, so
/// [`PostStore::list_posts`] returning ascending ids is creation order.
/// Deleted posts are gone: every later lookup reports `NotFound`.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user(&self, id: i64) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `UnknownUser` when `post.user_id` names no user.
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;

    async fn find_post(&self, id: i64) -> Result<Post, StoreError>;

    /// Most recently created post with exactly this title.
    async fn find_post_by_title(&self, title: &str) -> Result<Post, StoreError>;

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, StoreError>;

    async fn delete_post(&self, id: i64) -> Result<(), StoreError>;

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
