//! Identicon image endpoint.

use axum::{
    extract::{ConnectInfo, Extension, Query},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use chrono::Utc;
use identicon_common::{etag, parse_size, IdenticonError};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::state::AppState;

/// Query parameters. The short forms win when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct IdenticonParams {
    pub c: Option<String>,
    pub code: Option<String>,
    pub s: Option<String>,
    pub size: Option<String>,
}

impl IdenticonParams {
    fn code_param(&self) -> Option<&str> {
        self.c.as_deref().or(self.code.as_deref())
    }

    fn size_param(&self) -> Option<&str> {
        self.s.as_deref().or(self.size.as_deref())
    }
}

/// GET /identicon - Render (or fetch from cache) the identicon for a code.
///
/// Without a code the client address is hashed, and no `Expires` is sent
/// since the same URL yields different images for different clients.
#[instrument(skip(state, connect_info, headers))]
pub async fn identicon_handler(
    Extension(state): Extension<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Query(params): Query<IdenticonParams>,
) -> Response {
    state.metrics.record_request();

    let code_param = params.code_param();
    let code_specified = code_param.is_some_and(|c| !c.trim().is_empty());
    let remote = client_address(
        &headers,
        connect_info.as_ref().map(|ConnectInfo(addr)| addr),
        state.trust_forwarded_for,
    );
    let code = state.deriver.code_for(code_param, &remote);
    let size = parse_size(params.size_param());
    let tag = etag(code, size, state.cache_version);

    let mut response_headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&tag) {
        response_headers.insert(header::ETAG, value);
    }

    let request_tag = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    if request_tag == Some(tag.as_str()) {
        state.metrics.record_not_modified();
        return (StatusCode::NOT_MODIFIED, response_headers).into_response();
    }

    let png = match state.cache.get(&tag).await {
        Some(png) => {
            state.metrics.record_cache_hit();
            png
        }
        None => {
            state.metrics.record_cache_miss();
            match render_png(&state, code, size).await {
                Ok(png) => {
                    state.cache.put(&tag, png.clone()).await;
                    png
                }
                Err(e) => {
                    error!(code, size, error = %e, "Identicon render failed");
                    return error_response(&e);
                }
            }
        }
    };

    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    if code_specified {
        if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", state.expires_secs)) {
            response_headers.insert(header::CACHE_CONTROL, value);
        }
        if let Some(value) = http_date_after(state.expires_secs)
            .and_then(|date| HeaderValue::from_str(&date).ok())
        {
            response_headers.insert(header::EXPIRES, value);
        }
    }

    (StatusCode::OK, response_headers, png).into_response()
}

/// Render and encode off the async runtime.
async fn render_png(state: &AppState, code: u32, size: u32) -> Result<Bytes, IdenticonError> {
    let renderer = state.renderer.clone();
    let start = Instant::now();
    let result = tokio::task::spawn_blocking(move || renderer.render_png(code, size))
        .await
        .unwrap_or_else(|e| Err(IdenticonError::ResourceExhausted(format!("render task failed: {}", e))));
    let elapsed_us = start.elapsed().as_micros() as u64;

    state.metrics.record_render(elapsed_us, result.is_ok()).await;
    debug!(code, size, elapsed_us, "Rendered identicon");

    result.map(Bytes::from)
}

/// Address used to derive a code when the request has none.
pub fn client_address(
    headers: &HeaderMap,
    peer: Option<&SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(addr) = forwarded {
            return addr.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// RFC 7231 date `secs` seconds from now.
fn http_date_after(secs: u64) -> Option<String> {
    let delta = chrono::Duration::from_std(std::time::Duration::from_secs(secs)).ok()?;
    Utc::now()
        .checked_add_signed(delta)
        .map(|t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

fn error_response(err: &IdenticonError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string()).into_response()
}
