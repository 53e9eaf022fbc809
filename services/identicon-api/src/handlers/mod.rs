//! HTTP request handlers.
//!
//! - `identicon`: the image endpoint
//! - `metrics`: Health checks, Prometheus metrics, and JSON stats
//! - `cache`: Cache inspection and clearing

pub mod cache;
pub mod identicon;
pub mod metrics;

pub use cache::{cache_clear_handler, cache_stats_handler};
pub use identicon::{client_address, identicon_handler, IdenticonParams};
pub use metrics::{api_metrics_handler, health_handler, metrics_handler};
