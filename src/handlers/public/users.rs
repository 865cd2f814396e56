use axum::{extract::State, Json};
use tracing::info;

use crate::api::{CreateUserParams, Payload, ValidUser};
use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::{NewUser, User};
use crate::error::{ApiError, ApiResult};

/// POST /users - register an account
///
/// Expected input: `{ "name": "...", "email": "...", "password": "..." }`.
/// The password is stored only as an argon2 digest and never rendered.
pub async fn create(
    State(state): State<AppState>,
    Payload(params): Payload<CreateUserParams>,
) -> ApiResult<User> {
    let ValidUser { name, email, password } = params.validate()?;

    // CPU-bound, runs on the blocking pool
    let password_digest = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("Failed to process password")
        })??;

    let user = state
        .store
        .create_user(NewUser {
            name,
            email,
            password_digest,
        })
        .await?;

    info!("User {} registered", user.id);
    Ok(Json(user))
}
