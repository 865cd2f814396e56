use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use posts_api::auth::TokenService;
use posts_api::config;
use posts_api::database::{DatabaseManager, MemoryStore, PgStore};
use posts_api::{app, logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    logging::init();

    let config = config::config();
    info!("Starting Posts API in {:?} mode", config.environment);

    let tokens = TokenService::from_config(&config.security).context("JWT_SECRET must be set")?;

    let state = if config.database.url.is_some() {
        let pool = DatabaseManager::connect(&config.database).await?;
        let store = PgStore::new(pool);
        store.migrate().await?;
        AppState::new(store, tokens)
    } else {
        warn!("DATABASE_URL not set; using the in-memory store, data is lost on restart");
        AppState::new(MemoryStore::new(), tokens)
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Posts API listening on http://{}", bind_addr);

    axum::serve(listener, app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Posts API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
