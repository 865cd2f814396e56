use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::app::AppState;
use crate::database::StoreError;
use crate::error::ApiError;

/// User resolved from the token's `user_id`
#[derive(Clone, Debug)]
pub struct ValidatedUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Middleware that resolves the token's user against the store.
/// A validly signed token naming a user that does not exist is unauthorized.
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user = match state.store.find_user(auth_user.user_id).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            tracing::warn!("User validation failed: user {} not found", auth_user.user_id);
            return Err(ApiError::unauthorized("Token does not name an existing user"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!("User validation successful: {} ({})", user.email, user.id);

    request.extensions_mut().insert(ValidatedUser {
        id: user.id,
        name: user.name,
        email: user.email,
    });

    Ok(next.run(request).await)
}
