use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenService;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::PostStore;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, validate_user_middleware};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: impl PostStore + 'static, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(store),
            tokens: Arc::new(tokens),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Bearer token required
        .merge(protected_routes(state.clone()))
        .fallback(route_not_found);

    let router = if config.security.enable_cors {
        router.layer(cors_layer(&config.security))
    } else {
        router
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(public::posts::index))
        .route("/posts.json", get(public::posts::index))
        .route("/posts/:id", get(public::posts::show))
        .route("/users", post(public::users::create))
        .route("/sessions", post(public::sessions::create))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/posts", post(protected::posts::create))
        .route("/posts.json", post(protected::posts::create))
        .route(
            "/posts/:id",
            axum::routing::patch(protected::posts::update)
                .put(protected::posts::update)
                .delete(protected::posts::destroy),
        )
        // Layers run bottom-up: token first, then user lookup
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Posts API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "posts": "GET /posts, GET /posts/:id (public)",
            "posts_write": "POST /posts, PATCH /posts/:id, DELETE /posts/:id (bearer token)",
            "users": "POST /users (public)",
            "sessions": "POST /sessions (public - token acquisition)",
            "health": "GET /health (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
