use axum::{extract::State, Json};

use crate::api::PostId;
use crate::app::AppState;
use crate::database::models::Post;
use crate::error::ApiResult;

/// GET /posts(.json) - all posts in creation order
pub async fn index(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.store.list_posts().await?;
    Ok(Json(posts))
}

/// GET /posts/:id - single post
pub async fn show(State(state): State<AppState>, PostId(id): PostId) -> ApiResult<Post> {
    let post = state.store.find_post(id).await?;
    Ok(Json(post))
}
