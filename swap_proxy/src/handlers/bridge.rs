use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde_json::Value;
use tracing::info;

use crate::handlers::{ApiResult, body_params, normalized_json, query_params};
use crate::routers::fusion::fusion::{fusion_get_quote, fusion_prepare_swap};
use crate::routers::fusion::requests::{build_fusion_quote_request, build_fusion_swap_request};
use crate::state::AppState;

/// `GET /api/bridge/quote`
pub async fn get_bridge_quote(
    State(st): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let params = query_params(query);
    let request = build_fusion_quote_request(&params, &st.registry)?;
    info!(
        chain_id = request.chain_id,
        from = %request.from_token_address,
        to = %request.to_token_address,
        amount = %request.amount,
        "Fusion quote"
    );

    let envelope = fusion_get_quote(&st.upstream, &request).await?;
    normalized_json(envelope)
}

/// `POST /api/bridge/swap`
pub async fn bridge_swap(
    State(st): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let params = body_params(body)?;
    let request = build_fusion_swap_request(&params, &st.registry)?;
    info!(
        chain_id = request.chain_id,
        from = %request.from_token_address,
        to = %request.to_token_address,
        amount = %request.amount,
        "Fusion swap"
    );

    let envelope = fusion_prepare_swap(&st.upstream, &request).await?;
    normalized_json(envelope)
}
