use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use swap_models::constants::chains::ChainRegistry;

use crate::config::{ApiKey, Config, LogFormat, UpstreamConfig};
use crate::routers::UpstreamClient;
use crate::state::AppState;

pub const TEST_API_KEY: &str = "test-1inch-key";

pub fn init_tracing_in_tests() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().pretty().with_ansi(true))
        .try_init()
        .ok();
}

/// Every upstream family pointed at one mock server.
pub fn upstream_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        api_key: ApiKey::new(TEST_API_KEY),
        swap_api_url: format!("{base_url}/swap/v5.0"),
        fusion_api_url: format!("{base_url}/fusion/quoter/v2.0"),
        price_api_url: format!("{base_url}/price/v1.1"),
        timeout: Duration::from_secs(2),
    }
}

pub fn upstream_client(base_url: &str) -> UpstreamClient {
    UpstreamClient::new(&upstream_config(base_url)).expect("client builds")
}

/// State with the built-in chain table and the given shared keys.
pub fn test_state(base_url: &str, shared_keys: &[&str]) -> AppState {
    let cfg = Config {
        bind_addr: "127.0.0.1:0".parse().expect("valid addr"),
        environment: "test".to_string(),
        log_format: LogFormat::Pretty,
        upstream: upstream_config(base_url),
        shared_api_keys: shared_keys.iter().map(ApiKey::new).collect(),
        chain_registry_path: None,
    };

    AppState::new(cfg, ChainRegistry::default()).expect("state builds")
}
