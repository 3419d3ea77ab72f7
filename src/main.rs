//! Rental Edge - gateway binary
//!
//! Builds the process-wide cache, analytics queue and API client, starts
//! their background timers and serves the gateway API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rental_edge::api::create_router;
use rental_edge::{spawn_cleanup_task, spawn_flush_task, AppState, Config};

/// Main entry point for the gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache, analytics queue and API client
/// 4. Start the cache sweep and analytics flush timers
/// 5. Serve the Axum router on the configured port
/// 6. On SIGINT/SIGTERM stop the timers and drain queued analytics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_edge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rental Edge gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api={}, default_ttl={}s, port={}, batch_size={}, flush_interval={}s",
        config.api_base_url,
        config.cache_default_ttl,
        config.server_port,
        config.analytics_batch_size,
        config.analytics_flush_interval
    );

    let state = AppState::from_config(&config).context("failed to build HTTP client")?;
    info!("Cache, analytics queue and API client initialized");

    let queue_config = config.queue_config();
    let timers = vec![
        spawn_cleanup_task(
            state.cache.clone(),
            std::time::Duration::from_secs(config.cleanup_interval),
        ),
        spawn_flush_task(state.events.clone(), queue_config.flush_interval),
    ];
    info!("Background tasks started");

    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(timers))
        .await
        .context("server error")?;

    let sent = state.events.drain().await;
    info!(
        "Server shutdown complete ({} analytics events flushed, {} left undelivered)",
        sent,
        state.events.pending()
    );
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the timers.
async fn shutdown_signal(timers: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for timer in timers {
        timer.abort();
    }
    warn!("Background tasks aborted");
}
