use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::database::models::PostChanges;
use crate::error::ApiError;

/// `:id` path segment of `/posts/:id`, with an optional `.json` format suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        // Ids that cannot exist resolve the same way as ids that do not exist
        parse_post_id(&raw)
            .map(PostId)
            .ok_or_else(|| ApiError::not_found("Post not found"))
    }
}

pub fn parse_post_id(raw: &str) -> Option<i64> {
    raw.strip_suffix(".json")
        .unwrap_or(raw)
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
}

fn require(
    field: &'static str,
    value: Option<String>,
    errors: &mut HashMap<String, String>,
) -> String {
    match value {
        Some(v) => v,
        None => {
            errors.insert(field.to_string(), "is required".to_string());
            String::new()
        }
    }
}

fn require_present(
    field: &'static str,
    value: Option<String>,
    errors: &mut HashMap<String, String>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.insert(field.to_string(), "can't be blank".to_string());
            String::new()
        }
    }
}

fn finish<T>(value: T, errors: HashMap<String, String>) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ApiError::unprocessable_entity("Validation failed", errors))
    }
}

/// Body of `POST /posts`
#[derive(Debug, Default, Deserialize)]
pub struct CreatePostParams {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl CreatePostParams {
    /// Both fields must be present; their content is stored verbatim.
    pub fn validate(self) -> Result<(String, String), ApiError> {
        let mut errors = HashMap::new();
        let title = require("title", self.title, &mut errors);
        let body = require("body", self.body, &mut errors);
        finish((title, body), errors)
    }
}

/// Body of `PATCH /posts/:id`
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostParams {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl From<UpdatePostParams> for PostChanges {
    fn from(params: UpdatePostParams) -> Self {
        PostChanges {
            title: params.title,
            body: params.body,
        }
    }
}

/// Body of `POST /users`
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct ValidUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserParams {
    pub fn validate(self) -> Result<ValidUser, ApiError> {
        let mut errors = HashMap::new();
        let name = require("name", self.name, &mut errors);
        let email = require_present("email", self.email, &mut errors);
        let password = require_present("password", self.password, &mut errors);

        if !email.is_empty() && !email.contains('@') {
            errors.insert("email".to_string(), "is invalid".to_string());
        }

        finish(
            ValidUser {
                name,
                email: email.trim().to_lowercase(),
                password,
            },
            errors,
        )
    }
}

/// Body of `POST /sessions`
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionParams {
    pub email: Option<String>,
    pub password: Option<String>,
}
