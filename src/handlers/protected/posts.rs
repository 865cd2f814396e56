use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::api::{CreatePostParams, Payload, PostId, UpdatePostParams};
use crate::app::AppState;
use crate::database::models::{NewPost, Post};
use crate::error::ApiResult;
use crate::middleware::ValidatedUser;

/// POST /posts - create a post owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<ValidatedUser>,
    Payload(params): Payload<CreatePostParams>,
) -> ApiResult<Post> {
    let (title, body) = params.validate()?;

    let post = state
        .store
        .create_post(NewPost {
            title,
            body,
            user_id: user.id,
        })
        .await?;

    info!("Post {} created by user {}", post.id, user.id);
    Ok(Json(post))
}

/// PATCH|PUT /posts/:id - apply the given fields, leave the rest untouched.
///
/// Any authenticated user may update any post.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<ValidatedUser>,
    PostId(id): PostId,
    Payload(params): Payload<UpdatePostParams>,
) -> ApiResult<Post> {
    let post = state.store.update_post(id, params.into()).await?;

    info!("Post {} updated by user {}", post.id, user.id);
    Ok(Json(post))
}

/// DELETE /posts/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<ValidatedUser>,
    PostId(id): PostId,
) -> ApiResult<Value> {
    state.store.delete_post(id).await?;

    info!("Post {} destroyed by user {}", id, user.id);
    Ok(Json(json!({ "message": "Post successfully destroyed" })))
}
