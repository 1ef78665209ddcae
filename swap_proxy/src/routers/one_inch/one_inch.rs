use serde_json::Value;
use swap_models::network::http::url_with_sorted_query;

use crate::error::{ModelResultExt as _, ProxyResult};
use crate::routers::one_inch::requests::{OneInchQuoteRequest, OneInchSwapRequest};
use crate::routers::{UpstreamClient, UpstreamOperation};

pub async fn one_inch_get_quote(
    client: &UpstreamClient,
    request: &OneInchQuoteRequest,
) -> ProxyResult<Value> {
    let operation = UpstreamOperation::Quote;
    let query = request.to_query()?;

    let chain = request.chain_id;
    let base = format!("{}/{chain}/quote", client.swap_api_url());
    let url = url_with_sorted_query(&base, &query).for_operation(operation)?;

    client.get_json(operation, url).await
}

/// Returns the transaction for the caller to sign; nothing is broadcast here.
pub async fn one_inch_swap(
    client: &UpstreamClient,
    request: &OneInchSwapRequest,
) -> ProxyResult<Value> {
    let operation = UpstreamOperation::Swap;
    let query = request.to_query()?;

    let chain = request.chain_id;
    let base = format!("{}/{chain}/swap", client.swap_api_url());
    let url = url_with_sorted_query(&base, &query).for_operation(operation)?;

    client.get_json(operation, url).await
}
