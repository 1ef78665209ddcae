use std::process;

use error_stack::ResultExt as _;
use swap_models::log::init_tracing;
use swap_proxy::config::Config;
use swap_proxy::error::{Error, ProxyResult};
use swap_proxy::router;
use swap_proxy::state::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

const DEFAULT_LOG_DIRECTIVES: &str = "info,swap_proxy=debug,swap_models=debug,tower_http=info";

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("swap-proxy error: {err:?}");
        process::exit(1);
    }
}

async fn run() -> ProxyResult<()> {
    let cfg = Config::from_env()?;
    init_tracing(cfg.log_format.is_json(), DEFAULT_LOG_DIRECTIVES);

    if !cfg.auth_enabled() {
        warn!("SHARED_API_KEYS is empty, /api routes are open");
    }

    let bind_addr = cfg.bind_addr;
    let environment = cfg.environment.clone();
    let state = AppState::from_config(cfg)?;
    let app = router::build(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .change_context(Error::ServerError(format!("failed to bind {bind_addr}")))?;
    info!(%bind_addr, %environment, "swap-proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .change_context(Error::ServerError("server stopped unexpectedly".to_string()))?;

    info!("swap-proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
