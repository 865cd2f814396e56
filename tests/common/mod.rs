#![allow(dead_code)]

use anyhow::{Context, Result};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use tokio::net::TcpListener;

use posts_api::auth::{hash_password, TokenService};
use posts_api::config::AppConfig;
use posts_api::database::models::{NewPost, NewUser, Post, PostChanges, User};
use posts_api::database::MemoryStore;
use posts_api::AppState;

pub const SECRET: &str = "posts-api-test-secret";

/// One server per test, each with its own empty in-memory store
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let tokens = TokenService::new(SECRET, 0)?;
        let state = AppState::new(MemoryStore::new(), tokens);
        let router = posts_api::app(state.clone(), &AppConfig::development());

        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url,
            state,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Seed a user directly in the store; password is always "password"
    pub async fn create_user(&self, name: &str, email: &str) -> Result<User> {
        let user = self
            .state
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_digest: hash_password("password")?,
            })
            .await?;
        Ok(user)
    }

    pub async fn create_post(&self, user_id: i64, title: &str, body: &str) -> Result<Post> {
        let post = self
            .state
            .store
            .create_post(NewPost {
                title: title.to_string(),
                body: body.to_string(),
                user_id,
            })
            .await?;
        Ok(post)
    }

    pub async fn retitle_post(&self, id: i64, title: &str) -> Result<Post> {
        let post = self
            .state
            .store
            .update_post(
                id,
                PostChanges {
                    title: Some(title.to_string()),
                    body: None,
                },
            )
            .await?;
        Ok(post)
    }

    pub async fn destroy_post(&self, id: i64) -> Result<()> {
        self.state.store.delete_post(id).await?;
        Ok(())
    }
}

/// `Authorization` header value for a token signed the way external clients sign it
pub fn bearer(user_id: i64) -> String {
    bearer_signed_with(user_id, SECRET)
}

pub fn bearer_signed_with(user_id: i64, secret: &str) -> String {
    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "user_id": user_id }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encode test token");
    format!("Bearer {}", token)
}
