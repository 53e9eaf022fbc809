//! Cache management handlers.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::state::AppState;

/// GET /api/cache/stats - Byte cache statistics
#[instrument(skip(state))]
pub async fn cache_stats_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let stats = state.cache.stats();
    Json(serde_json::json!({
        "entries": stats.entry_count,
        "size_bytes": stats.size_bytes,
        "hits": stats.hits,
        "misses": stats.misses,
        "hit_rate": stats.hit_rate(),
        "evictions": stats.evictions,
        "eviction_runs": stats.eviction_runs,
        "expired": stats.expired,
    }))
}

/// POST /api/cache/clear - Drop every cached identicon
#[instrument(skip(state))]
pub async fn cache_clear_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    info!("Clearing identicon cache");
    state.cache.clear().await;
    (StatusCode::OK, "Identicon cache cleared")
}
