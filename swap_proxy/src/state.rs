use std::sync::Arc;

use error_stack::ResultExt as _;
use swap_models::constants::chains::ChainRegistry;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, ProxyResult};
use crate::routers::UpstreamClient;

/// Shared, read-only handler state; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub registry: Arc<ChainRegistry>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(cfg: Config, registry: ChainRegistry) -> ProxyResult<Self> {
        let upstream = UpstreamClient::new(&cfg.upstream)?;

        Ok(Self {
            cfg: Arc::new(cfg),
            registry: Arc::new(registry),
            upstream,
        })
    }

    /// Loads the chain table named by the config, or the built-in one.
    pub fn from_config(cfg: Config) -> ProxyResult<Self> {
        let registry = match &cfg.chain_registry_path {
            Some(path) => ChainRegistry::from_json_file(path)
                .change_context(Error::ConfigError(format!(
                    "failed to load chain registry from {}",
                    path.display()
                )))?,
            None => ChainRegistry::default(),
        };
        info!(chains = ?registry.supported_chain_ids(), "Chain registry loaded");

        Self::new(cfg, registry)
    }
}
