use tokio::net::TcpListener;
use tracing::info;

use kvr_sdk::Fleet;

use crate::config::ServerConfig;
use crate::dispatch::ToolDispatcher;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// KVR tool server.
pub struct KvrServer {
    config: ServerConfig,
    fleet: Fleet,
}

impl KvrServer {
    pub fn new(config: ServerConfig, fleet: Fleet) -> Self {
        let fleet = fleet.with_max_bulk_keys(config.max_bulk_keys);
        Self { config, fleet }
    }

    /// Load the configured catalog and bind an in-memory store to every
    /// namespace in it.
    pub fn in_memory(config: ServerConfig) -> ServerResult<Self> {
        let catalog = config.load_catalog()?;
        Ok(Self::new(config, Fleet::in_memory(catalog)))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let dispatcher = ToolDispatcher::new(self.fleet.clone())
            .with_health_excluded(self.config.health_excluded.clone());
        build_router(AppState::new(dispatcher))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(
            addr = %self.config.bind_addr,
            namespaces = self.fleet.registry().catalog().len(),
            "KVR server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
