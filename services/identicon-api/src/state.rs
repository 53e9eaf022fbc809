//! Application state shared across handlers.

use anyhow::Result;
use identicon_common::CodeDeriver;
use metrics_exporter_prometheus::PrometheusHandle;
use renderer::{QuiltRenderer, RenderConfig};
use std::sync::Arc;
use storage::{ByteCache, MemoryByteCache, NoopCache};
use tracing::info;

use crate::config::Args;
use crate::metrics::MetricsCollector;

pub struct AppState {
    pub renderer: Arc<QuiltRenderer>,
    pub deriver: CodeDeriver,
    pub cache: Arc<dyn ByteCache>,
    pub metrics: Arc<MetricsCollector>,
    /// Operator-controlled part of every ETag.
    pub cache_version: u32,
    /// Client cache lifetime for identicons requested with an explicit code.
    pub expires_secs: u64,
    pub trust_forwarded_for: bool,
    /// Present when a Prometheus recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        renderer: QuiltRenderer,
        deriver: CodeDeriver,
        cache: Arc<dyn ByteCache>,
    ) -> Self {
        Self {
            renderer: Arc::new(renderer),
            deriver,
            cache,
            metrics: Arc::new(MetricsCollector::new()),
            cache_version: 0,
            expires_secs: crate::config::DEFAULT_EXPIRES_SECS,
            trust_forwarded_for: false,
            prometheus: None,
        }
    }

    /// Build state from parsed command line arguments.
    pub fn from_args(args: &Args) -> Result<Self> {
        let renderer = QuiltRenderer::new(RenderConfig {
            patch_size: args.patch_size,
            background: args.background,
        })?;
        let deriver = CodeDeriver::new(args.salt.clone())?;

        let cache: Arc<dyn ByteCache> = if args.cache_size_mb == 0 {
            info!("Identicon cache disabled");
            Arc::new(NoopCache)
        } else {
            info!(
                size_mb = args.cache_size_mb,
                ttl_secs = args.cache_ttl_secs,
                "Identicon cache enabled"
            );
            Arc::new(MemoryByteCache::new(args.cache_size_mb, args.cache_ttl_secs))
        };

        let mut state = Self::new(renderer, deriver, cache);
        state.cache_version = args.cache_version;
        state.expires_secs = args.expires_secs;
        state.trust_forwarded_for = args.trust_forwarded_for;
        Ok(state)
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
