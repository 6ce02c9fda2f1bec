//! Rugscope API server binary entrypoint.

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rugscope_common::config::AppConfig;

use rugscope_api::routes::create_router;
use rugscope_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("rugscope_api=debug,rugscope_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting Rugscope API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    let state = AppState::from_config(&config)?;
    tracing::info!(mode = ?config.analytics_mode, "Analytics producers ready");

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Rugscope API server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal, stopping gracefully...");
}
