//! HTTP server setup and routing.

mod extractors;
mod routes;
mod tracks;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::catalog::ScoredCatalog;
use crate::config::AppConfig;

/// Shared application state passed to all handlers. The scored catalog is
/// built once before the router exists and is read-only from here on, so no
/// locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<ScoredCatalog>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: ScoredCatalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Creates the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(routes::health))
        // Catalog metadata
        .route("/genres", get(tracks::list_genres))
        .route("/contexts", get(tracks::list_contexts))
        // Ranked track listings
        .route("/top", get(tracks::top_tracks))
        .route("/top_by_genre", get(tracks::top_tracks_by_genre))
        .route("/top_by_context", get(tracks::top_tracks_by_context))
        .route("/search_ranked", get(tracks::search_ranked))
        // Precomputed per-track scores
        .route("/predict", post(tracks::predict_track_contexts));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
