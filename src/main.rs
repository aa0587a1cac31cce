use std::sync::Arc;
use anyhow::Context;
use time_tracker::{
    cache::Cache,
    config::{Config, StoreBackend},
    logging,
    routes,
    services::{MemoryStore, PgStore, Store, UserInfoClient},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    logging::init(config.env);
    tracing::info!("Starting time_tracker service in {:?} mode", config.env);

    // Connect the store; migrations run here
    let store: Arc<dyn Store> = match config.database.backend {
        StoreBackend::Postgres => Arc::new(
            PgStore::connect(&config.database)
                .await
                .context("Failed to connect to database")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    // Warm the cache before accepting traffic; no degraded mode
    let cache = Arc::new(Cache::new());
    cache
        .load_all(store.as_ref())
        .await
        .context("Failed to load cache from database")?;

    let user_info = Arc::new(
        UserInfoClient::new(&config.user_info).context("Failed to build user info client")?,
    );

    let state = AppState::new(store, cache, user_info);
    let app = routes::router(
        state,
        config.server.max_body_size,
        config.server.request_timeout(),
    );

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("HTTP server listening on {}", address);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
