use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labweb::{AppState, Config, Result, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    setup_tracing();

    let config = Config::from_env();

    tracing::info!(
        "Loaded configuration: env '{}', port {}",
        config.environment,
        config.listen_port
    );
    match &config.redis {
        Some(redis) => tracing::info!("Hit counter store at {} (db {})", redis.addr(), redis.db),
        None => tracing::info!("Hit counter store disabled"),
    }

    let listen_port = config.listen_port;
    let state = Arc::new(AppState::new(config));

    // Shutdown channel (graceful shutdown)
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Wait for Ctrl+C
    tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let app = create_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{listen_port}").parse().map_err(|e| {
        tracing::error!("Invalid server address: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address: {}", e);
        e
    })?;

    tracing::info!("labweb starting on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /        - Index with hit counter");
    tracing::info!("  - GET /health  - Health check");
    tracing::info!("  - GET /metrics - Prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown({
            let mut shutdown_rx = shutdown_rx.clone();
            async move {
                let _ = shutdown_rx.changed().await;
                tracing::info!("HTTP server shutting down");
            }
        })
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            e
        })?;

    Ok(())
}

fn setup_tracing() {
    // EnvFilter::from_default_env honors RUST_LOG; fall back to "info"
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
