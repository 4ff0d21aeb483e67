//! Context Ranker - Entry Point

use anyhow::Context as _;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use context_ranker::{catalog::ScoredCatalog, config::AppConfig, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("Starting Context Ranker");

    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config from environment: {e}, using defaults");
        AppConfig::default()
    });

    info!(
        dataset = %config.catalog.dataset_path.display(),
        model = %config.model.path.display(),
        "Configuration loaded"
    );

    // Build the scored table once, before serving anything. Loading and
    // batch inference are CPU-bound, so they run off the async runtime.
    // Any failure here is fatal: the process must not start without a table.
    let dataset_path = config.catalog.dataset_path.clone();
    let model_path = config.model.path.clone();
    let catalog = tokio::task::spawn_blocking(move || {
        ScoredCatalog::initialize(&dataset_path, &model_path)
    })
    .await
    .context("Catalog scoring task panicked")?
    .context("Failed to build scored catalog")?;

    info!(tracks = catalog.len(), "Catalog loaded and scored");

    // Create app state and router
    let addr = config.server.socket_addr();
    let state = server::AppState::new(config, catalog);
    let app = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(%addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "context_ranker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
