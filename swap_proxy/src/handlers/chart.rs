use std::collections::HashMap;

use axum::extract::{Query, State};
use serde_json::Value;

use crate::handlers::{ApiResult, normalized_json, query_params};
use crate::prices::chart::{build_chart_request, get_chart_data};
use crate::state::AppState;

/// `GET /api/chart`
pub async fn chart(
    State(st): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let request = build_chart_request(&query_params(query))?;
    let candles = get_chart_data(&st.upstream, &request).await?;
    normalized_json(candles)
}
