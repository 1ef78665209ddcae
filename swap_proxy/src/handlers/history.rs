use std::collections::HashMap;

use axum::extract::{Path, Query};
use serde_json::Value;
use swap_models::models::responses::HistoryResponse;
use tracing::debug;

use crate::error::ParamLocation;
use crate::handlers::{ApiResult, normalized_json, query_params};
use crate::routers::params::{CHAIN_ID, parse_chain_id, require};

/// `GET /api/history/:address`
///
/// No public history source exists, so this always answers with the empty
/// fallback payload.
pub async fn get_history(
    Path(address): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let params = query_params(query);
    require(&params, ParamLocation::Any, &[CHAIN_ID])?;
    let chain_id = parse_chain_id(&params)?;
    debug!(%address, chain_id, "History requested");

    normalized_json(HistoryResponse::fallback(address, chain_id))
}
