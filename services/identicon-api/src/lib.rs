//! Identicon HTTP service library.
//!
//! Exposes the router and its parts so integration tests can drive the
//! service without binding a socket.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Identicon images
        .route("/identicon", get(handlers::identicon_handler))
        .route("/identicon.png", get(handlers::identicon_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/metrics", get(handlers::api_metrics_handler))
        // Cache management
        .route("/api/cache/stats", get(handlers::cache_stats_handler))
        .route("/api/cache/clear", post(handlers::cache_clear_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
