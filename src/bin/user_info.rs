use std::sync::Arc;
use anyhow::Context;
use time_tracker::{config::Config, logging, routes, services::PassportDirectory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    logging::init(config.env);
    tracing::info!("Starting user_info service in {:?} mode", config.env);

    let directory = Arc::new(PassportDirectory::seeded());
    let app = routes::user_info_router(directory);

    let address = format!("{}:{}", config.user_info.host, config.user_info.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("User info service listening on {}", address);
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
