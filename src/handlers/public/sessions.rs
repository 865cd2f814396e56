use axum::{extract::State, Json};
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{CreateSessionParams, Payload};
use crate::app::AppState;
use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub jwt: String,
    pub user_id: i64,
    pub email: String,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Verified in place of a stored digest when the email is unknown
static DUMMY_DIGEST: Lazy<String> =
    Lazy::new(|| hash_password("posts-api-dummy-password").unwrap_or_default());

/// POST /sessions - exchange email + password for a bearer token
pub async fn create(
    State(state): State<AppState>,
    Payload(params): Payload<CreateSessionParams>,
) -> ApiResult<SessionResponse> {
    let email = params.email.unwrap_or_default().trim().to_lowercase();
    let password = params.password.unwrap_or_default();

    let user = state.store.find_user_by_email(&email).await?;
    let digest = match &user {
        Some(user) => user.password_digest.clone(),
        None => (*DUMMY_DIGEST).clone(),
    };

    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &digest))
        .await
        .map_err(|e| {
            tracing::error!("Password check task failed: {}", e);
            ApiError::internal_server_error("Failed to process password")
        })?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        None => {
            warn!("Login failed: unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let jwt = state.tokens.issue(user.id)?;

    info!("User {} signed in", user.id);
    Ok(Json(SessionResponse {
        jwt,
        user_id: user.id,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_digest_is_a_real_argon2_hash() {
        assert!(DUMMY_DIGEST.starts_with("$argon2"));
        assert!(!verify_password("password", &DUMMY_DIGEST));
        assert!(!verify_password("", &DUMMY_DIGEST));
    }
}
