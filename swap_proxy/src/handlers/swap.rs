use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde_json::Value;
use tracing::info;

use crate::handlers::{ApiResult, body_params, normalized_json, query_params};
use crate::routers::one_inch::one_inch::{one_inch_get_quote, one_inch_swap};
use crate::routers::one_inch::requests::{build_quote_request, build_swap_request};
use crate::state::AppState;

/// `GET /api/swap/quote`
pub async fn get_quote(
    State(st): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let params = query_params(query);
    let request = build_quote_request(&params, &st.registry)?;
    info!(
        chain_id = request.chain_id,
        from = %request.from_token_address,
        to = %request.to_token_address,
        amount = %request.amount,
        "Classic quote"
    );

    let quote = one_inch_get_quote(&st.upstream, &request).await?;
    normalized_json(quote)
}

/// `POST /api/swap/swap`
pub async fn swap(
    State(st): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let params = body_params(body)?;
    let request = build_swap_request(&params, &st.registry)?;
    info!(
        chain_id = request.chain_id,
        from = %request.from_token_address,
        to = %request.to_token_address,
        amount = %request.amount,
        "Classic swap"
    );

    let swap = one_inch_swap(&st.upstream, &request).await?;
    normalized_json(swap)
}
