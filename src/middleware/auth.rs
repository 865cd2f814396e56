use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Rejects the request unless it carries `Authorization: Bearer <token>` with a
/// token signed by this server. The decoded user id is attached for downstream
/// layers.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(|msg| {
        tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let user_id = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected bearer token on {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = match auth_str.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") => token.trim(),
        _ => return Err("Authorization header must use Bearer token format"),
    };

    if token.is_empty() {
        return Err("Empty JWT token");
    }

    Ok(token)
}
