//! Chart data derived from the current spot price.
//!
//! The price API has no OHLC history, so every candle in the requested window
//! carries the current price.

use error_stack::report;
use serde_json::Value;
use swap_models::constants::tokens::is_evm_address;
use swap_models::models::params::ParamBag;
use swap_models::models::responses::ChartPoint;
use swap_models::network::http::url_with_sorted_query;
use tracing::debug;

use crate::error::{Error, ModelResultExt as _, ParamLocation, ProxyResult};
use crate::routers::params::{CHAIN_ID, parse_chain_id, require, required_text};
use crate::routers::{UpstreamClient, UpstreamOperation};
use crate::utils::number_conversion::{scale_down_to_f64, value_to_decimal};

const TOKEN_ADDRESS: &str = "tokenAddress";
const FROM: &str = "from";
const TO: &str = "to";
const RESOLUTION: &str = "resolution";
const CHART_REQUIRED: [&str; 5] = [TOKEN_ADDRESS, CHAIN_ID, FROM, TO, RESOLUTION];

pub const MAX_CANDLES: usize = 10_000;
pub const DEFAULT_RESOLUTION_SECS: u64 = 3_600;
/// Raw value assumed when the price API has no usable price (1 unit at 18 decimals).
const FALLBACK_RAW_PRICE: u64 = 1_000_000_000_000_000_000;
/// The price API quotes in 10^-12 of the displayed unit.
const PRICE_SCALE_EXPONENT: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub chain_id: u32,
    pub token_address: String,
    /// Unix seconds, inclusive
    pub from: u64,
    /// Unix seconds, inclusive
    pub to: u64,
    pub interval_secs: u64,
}

pub fn build_chart_request(params: &ParamBag) -> ProxyResult<ChartRequest> {
    require(params, ParamLocation::Query, &CHART_REQUIRED)?;

    Ok(ChartRequest {
        chain_id: parse_chain_id(params)?,
        token_address: checked_token_address(&required_text(params, TOKEN_ADDRESS)?)?,
        from: parse_timestamp(params, FROM)?,
        to: parse_timestamp(params, TO)?,
        interval_secs: resolution_seconds(&required_text(params, RESOLUTION)?),
    })
}

/// Unknown resolutions fall back to one hour.
pub fn resolution_seconds(resolution: &str) -> u64 {
    match resolution {
        "1m" => 60,
        "5m" => 300,
        "15m" => 900,
        "1h" => 3_600,
        "4h" => 14_400,
        "1d" => 86_400,
        _ => DEFAULT_RESOLUTION_SECS,
    }
}

/// The address becomes a path segment of the price API URL, so only a plain
/// EVM address is accepted.
fn checked_token_address(raw: &str) -> ProxyResult<String> {
    let address = raw.trim();
    if is_evm_address(address) {
        Ok(address.to_string())
    } else {
        Err(report!(Error::InvalidParameter(format!(
            "{TOKEN_ADDRESS} must be a 0x-prefixed 40 hex digit address, got {raw:?}"
        ))))
    }
}

fn parse_timestamp(params: &ParamBag, name: &str) -> ProxyResult<u64> {
    let raw = required_text(params, name)?;
    raw.trim().parse::<u64>().map_err(|_| {
        report!(Error::InvalidParameter(format!(
            "{name} must be a unix timestamp in seconds, got {raw:?}"
        )))
    })
}

pub async fn get_spot_price(
    client: &UpstreamClient,
    chain_id: u32,
    token_address: &str,
) -> ProxyResult<f64> {
    let operation = UpstreamOperation::Chart;
    let token_address = checked_token_address(token_address)?;
    let base = format!("{}/{chain_id}", client.price_api_url());
    let mut url = url_with_sorted_query(&base, &Value::Object(Default::default()))
        .for_operation(operation)?;
    url.path_segments_mut()
        .map_err(|()| {
            report!(Error::InternalError {
                operation,
                message: "price API base URL cannot take path segments".to_string(),
            })
        })?
        .push(&token_address);

    let raw = client.get_json(operation, url).await?;
    Ok(spot_price_from_response(&raw, &token_address))
}

/// Picks `token_address` out of the `{address: price}` map and scales it.
pub fn spot_price_from_response(raw: &Value, token_address: &str) -> f64 {
    let quoted = raw.get(token_address).or_else(|| {
        raw.as_object().and_then(|prices| {
            prices
                .iter()
                .find(|(address, _)| address.eq_ignore_ascii_case(token_address))
                .map(|(_, price)| price)
        })
    });

    let price = quoted
        .and_then(value_to_decimal)
        .filter(|price| price.is_sign_positive() && !price.is_zero())
        .unwrap_or_else(|| FALLBACK_RAW_PRICE.into());

    scale_down_to_f64(price, PRICE_SCALE_EXPONENT).unwrap_or_default()
}

pub fn flat_candles(price: f64, from: u64, to: u64, interval_secs: u64) -> Vec<ChartPoint> {
    let step = interval_secs.max(1);
    let mut candles = Vec::new();
    let mut time = from;

    while time <= to && candles.len() < MAX_CANDLES {
        candles.push(ChartPoint {
            time,
            open: price,
            high: price * 1.01,
            low: price * 0.99,
            close: price,
            volume: 0,
        });

        match time.checked_add(step) {
            Some(next) => time = next,
            None => break,
        }
    }

    candles
}

pub async fn get_chart_data(
    client: &UpstreamClient,
    request: &ChartRequest,
) -> ProxyResult<Vec<ChartPoint>> {
    let price = get_spot_price(client, request.chain_id, &request.token_address).await?;
    let candles = flat_candles(price, request.from, request.to, request.interval_secs);
    debug!(
        chain_id = request.chain_id,
        price,
        candles = candles.len(),
        "Built chart data"
    );

    Ok(candles)
}
