use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewPost, NewUser, Post, PostChanges, User};
use crate::database::store::{PostStore, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_digest TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        user_id BIGINT NOT NULL REFERENCES users (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS index_posts_on_user_id ON posts (user_id)",
];

const USER_COLUMNS: &str = "id, name, email, password_digest, created_at, updated_at";
const POST_COLUMNS: &str = "id, title, body, user_id, created_at, updated_at";

// SQLSTATE codes
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they do not exist yet
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        }
        tx.commit().await?;
        info!("Database schema is up to date");
        Ok(())
    }
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|e| e.code())
        .map(|code| code.into_owned())
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_digest) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_digest)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match sqlstate(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    StoreError::Conflict(format!("email '{}' is already taken", user.email))
                }
                _ => StoreError::Sqlx(e),
            })
    }

    async fn find_user(&self, id: i64) -> Result<User, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(StoreError::user_not_found)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let sql = format!(
            "INSERT INTO posts (title, body, user_id) VALUES ($1, $2, $3) RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(&post.title)
            .bind(&post.body)
            .bind(post.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match sqlstate(&e).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => StoreError::UnknownUser(post.user_id),
                _ => StoreError::Sqlx(e),
            })
    }

    async fn find_post(&self, id: i64) -> Result<Post, StoreError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(StoreError::post_not_found)
    }

    async fn find_post_by_title(&self, title: &str) -> Result<Post, StoreError> {
        let sql = format!(
            "SELECT {} FROM posts WHERE title = $1 ORDER BY id DESC LIMIT 1",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(StoreError::post_not_found)
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        let sql = format!(
            "UPDATE posts SET title = COALESCE($2, title), body = COALESCE($3, body), updated_at = now() \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.body)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(StoreError::post_not_found)
    }

    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::post_not_found());
        }
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let sql = format!("SELECT {} FROM posts ORDER BY id ASC", POST_COLUMNS);
        Ok(sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
