//! FlowWatch - Binary Entry Point
//!
//! Loads configuration, opens the store and serves the HTTP API.

use std::sync::Arc;

use flowwatch::api::create_router;
use flowwatch::{AppState, Config, EventStore, EventStoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flowwatch=info,tower_http=info")),
        )
        .init();

    let store = Arc::new(EventStore::open(EventStoreConfig::new(&config.data_dir))?);
    let state = Arc::new(AppState::new(store, &config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(
        title = %config.app_title,
        version = flowwatch::VERSION,
        "listening on http://{}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
