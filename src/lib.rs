pub mod api;
pub mod cache;
pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod price_provider;
pub mod providers;
pub mod rate_provider;
pub mod symbols;

use anyhow::{Context, Result};
use tracing::info;

/// Loads configuration, wires the fetchers, and serves until SIGINT or
/// SIGTERM.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("fxgate starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    tracing::debug!("Loaded config: {config:#?}");

    let state = api::AppState::from_config(&config);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!("Listening on http://{}", config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
