//! Shared application state for the gateway.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pitchside_session::RouteTable;

use crate::backend_client::BackendClient;
use crate::config::GatewayConfig;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration
    pub config: Arc<GatewayConfig>,

    /// Tournament backend client
    pub backend: BackendClient,

    /// Navigation map the guard runs against
    pub routes: Arc<RouteTable>,

    /// Application shell HTML, when an `index.html` was configured
    pub shell: Option<Arc<str>>,

    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: GatewayConfig, routes: RouteTable, shell: Option<String>) -> Self {
        let backend = BackendClient::new(
            config.backend.base_url.clone(),
            Duration::from_secs(config.backend.timeout_secs),
        );
        Self {
            config: Arc::new(config),
            backend,
            routes: Arc::new(routes),
            shell: shell.map(Arc::from),
            start_time: Instant::now(),
        }
    }

    /// Load the configured application shell, if any.
    pub async fn load_shell(config: &GatewayConfig) -> anyhow::Result<Option<String>> {
        let Some(path) = config.session.index_html.as_ref() else {
            return Ok(None);
        };
        let html = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read application shell {}: {}", path.display(), e))?;
        tracing::info!(path = %path.display(), "Loaded application shell");
        Ok(Some(html))
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
