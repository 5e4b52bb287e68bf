use anyhow::Context;
use clinic_server::config::{self, ServerConfig, APP_NAME, APP_VERSION};
use clinic_server::{app, AppState};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let manager = config
        .open_manager()
        .with_context(|| format!("failed to open record store: {}", config.store))?;

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        "{} v{} listening on {} (store: {})",
        APP_NAME,
        APP_VERSION,
        addr,
        config.store
    );

    axum::serve(listener, app(AppState::new(manager), config.cors_origin.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
