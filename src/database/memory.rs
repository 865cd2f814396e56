use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::models::{NewPost, NewUser, Post, PostChanges, User};
use crate::database::store::{PostStore, StoreError};

/// In-process store. Maps are keyed by id, so iteration order is creation order.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    last_user_id: i64,
    last_post_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.inner.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email '{}' is already taken", user.email)));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            password_digest: user.password_digest,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<User, StoreError> {
        self.inner
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(StoreError::user_not_found)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut tables = self.inner.write().await;

        if !tables.users.contains_key(&post.user_id) {
            return Err(StoreError::UnknownUser(post.user_id));
        }

        tables.last_post_id += 1;
        let now = Utc::now();
        let post = Post {
            id: tables.last_post_id,
            title: post.title,
            body: post.body,
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: i64) -> Result<Post, StoreError> {
        self.inner
            .read()
            .await
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(StoreError::post_not_found)
    }

    async fn find_post_by_title(&self, title: &str) -> Result<Post, StoreError> {
        let tables = self.inner.read().await;
        tables
            .posts
            .values()
            .rev()
            .find(|p| p.title == title)
            .cloned()
            .ok_or_else(StoreError::post_not_found)
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        let mut tables = self.inner.write().await;
        let post = tables.posts.get_mut(&id).ok_or_else(StoreError::post_not_found)?;
        changes.apply(post, Utc::now());
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(StoreError::post_not_found)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.inner.read().await.posts.values().cloned().collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_user() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                name: "kat".to_string(),
                email: "kat@example.com".to_string(),
                password_digest: "digest".to_string(),
            })
            .await
            .unwrap();
        (store, user)
    }

    fn new_post(title: &str, user_id: i64) -> NewPost {
        NewPost {
            title: title.to_string(),
            body: "here's the post".to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn list_keeps_creation_order_after_update_and_delete() {
        let (store, user) = store_with_user().await;
        let first = store.create_post(new_post("post", user.id)).await.unwrap();
        let second = store.create_post(new_post("post2", user.id)).await.unwrap();
        store.create_post(new_post("post3", user.id)).await.unwrap();

        store
            .update_post(first.id, PostChanges { title: Some("post1".to_string()), body: None })
            .await
            .unwrap();
        store.delete_post(second.id).await.unwrap();

        let titles: Vec<String> = store
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["post1", "post3"]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let (store, user) = store_with_user().await;
        let a = store.create_post(new_post("a", user.id)).await.unwrap();
        store.delete_post(a.id).await.unwrap();
        let b = store.create_post(new_post("b", user.id)).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn deleted_post_is_not_found() {
        let (store, user) = store_with_user().await;
        let post = store.create_post(new_post("gone", user.id)).await.unwrap();
        store.delete_post(post.id).await.unwrap();

        assert!(matches!(store.find_post(post.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_post(post.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update_post(post.id, PostChanges::default()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn find_by_title_prefers_newest() {
        let (store, user) = store_with_user().await;
        store.create_post(new_post("dup", user.id)).await.unwrap();
        let newest = store.create_post(new_post("dup", user.id)).await.unwrap();
        assert_eq!(store.find_post_by_title("dup").await.unwrap().id, newest.id);
        assert!(store.find_post_by_title("missing").await.is_err());
    }

    #[tokio::test]
    async fn post_requires_existing_user() {
        let store = MemoryStore::new();
        let err = store.create_post(new_post("orphan", 42)).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownUser(42)));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (store, _) = store_with_user().await;
        let err = store
            .create_user(NewUser {
                name: "other".to_string(),
                email: "kat@example.com".to_string(),
                password_digest: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
