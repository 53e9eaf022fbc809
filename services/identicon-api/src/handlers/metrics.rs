//! Health checks, metrics, and monitoring endpoints.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use identicon_common::RENDER_FORMAT_VERSION;
use std::sync::Arc;
use tracing::instrument;

use crate::state::AppState;

// ============================================================================
// Health Checks
// ============================================================================

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ============================================================================
// Prometheus Metrics
// ============================================================================

/// GET /metrics - Prometheus metrics endpoint
///
/// Cache gauges are refreshed on scrape so they never lag the cache.
#[instrument(skip(state))]
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.record_cache_stats(&state.cache.stats());

    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "metrics recorder not installed".to_string(),
        ),
    }
}

// ============================================================================
// JSON Metrics API
// ============================================================================

/// GET /api/metrics - JSON metrics
#[instrument(skip(state))]
pub async fn api_metrics_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let snapshot = state.metrics.snapshot().await;
    let cache = state.cache.stats();

    Json(serde_json::json!({
        "service": snapshot,
        "cache": cache,
        "cache_hit_rate": cache.hit_rate(),
        "renderer": {
            "patch_size": state.renderer.config().patch_size,
            "source_size": state.renderer.source_size(),
            "background": state.renderer.config().background,
            "format_version": RENDER_FORMAT_VERSION,
            "cache_version": state.cache_version,
        }
    }))
}
