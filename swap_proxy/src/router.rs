use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

/// Matches the JSON body cap of the deployed frontend proxy.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/swap/quote", get(handlers::swap::get_quote))
        .route("/swap/swap", post(handlers::swap::swap))
        .route("/bridge/quote", get(handlers::bridge::get_bridge_quote))
        .route("/bridge/swap", post(handlers::bridge::bridge_swap))
        .route("/chart", get(handlers::chart::chart))
        .route("/history/:address", get(handlers::history::get_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_shared_key,
        ));

    Router::new()
        .route("/health", get(handlers::public::health))
        .nest("/api", api_routes)
        .fallback(handlers::public::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
