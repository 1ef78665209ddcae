use error_stack::Report;
use serde::Serialize;
use serde_json::Value;
use swap_models::constants::chains::ChainRegistry;
use swap_models::constants::tokens::EVM_NULL_ADDRESS;
use swap_models::models::params::{LooseValue, ParamBag};

use crate::error::{Error, ParamLocation, ProxyResult};
use crate::routers::UpstreamOperation;
use crate::routers::params::{
    AMOUNT, CHAIN_ID, FROM_ADDRESS, FROM_TOKEN_ADDRESS, TO_TOKEN_ADDRESS, normalized_token,
    parse_amount, parse_chain_id, require,
};

const QUOTE_REQUIRED: [&str; 4] = [FROM_TOKEN_ADDRESS, TO_TOKEN_ADDRESS, AMOUNT, CHAIN_ID];
const SWAP_REQUIRED: [&str; 5] = [
    FROM_TOKEN_ADDRESS,
    TO_TOKEN_ADDRESS,
    AMOUNT,
    FROM_ADDRESS,
    CHAIN_ID,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage: Option<LooseValue>,
    /// Integrator fee in basis points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_permit2: Option<LooseValue>,
    /// Integrator tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LooseValue>,
}

/// Query sent to the fusion quoter; serialized as-is into the query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionQuoteRequest {
    #[serde(skip)]
    pub chain_id: u32,
    pub from_token_address: String,
    pub to_token_address: String,
    pub amount: String,
    pub wallet_address: String,
    /// Set when the caller intends to place the order
    pub enable_estimate: bool,
    #[serde(flatten)]
    pub options: FusionOptions,
}

impl FusionQuoteRequest {
    pub fn to_query(&self, operation: UpstreamOperation) -> ProxyResult<Value> {
        serde_json::to_value(self).map_err(|e| {
            Report::new(e).change_context(Error::InternalError {
                operation,
                message: "failed to encode request parameters".to_string(),
            })
        })
    }
}

/// Preset used when the quoter recommends none.
pub const DEFAULT_PRESET: &str = "fast";

/// Query of the order build call; the quote itself travels as the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionBuildQuery<'a> {
    pub wallet_address: &'a str,
    pub preset: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a LooseValue>,
}

impl<'a> FusionBuildQuery<'a> {
    pub fn new(request: &'a FusionQuoteRequest, recommended_preset: &'a Value) -> Self {
        Self {
            wallet_address: &request.wallet_address,
            preset: recommended_preset.as_str().unwrap_or(DEFAULT_PRESET),
            source: request.options.source.as_ref(),
        }
    }

    pub fn to_query(&self, operation: UpstreamOperation) -> ProxyResult<Value> {
        serde_json::to_value(self).map_err(|e| {
            Report::new(e).change_context(Error::InternalError {
                operation,
                message: "failed to encode order build parameters".to_string(),
            })
        })
    }
}

pub fn build_fusion_quote_request(
    params: &ParamBag,
    registry: &ChainRegistry,
) -> ProxyResult<FusionQuoteRequest> {
    let operation = UpstreamOperation::BridgeQuote;
    require(params, ParamLocation::Query, &QUOTE_REQUIRED)?;

    let chain_id = parse_chain_id(params)?;
    let amount = parse_amount(params)?;

    Ok(FusionQuoteRequest {
        chain_id,
        from_token_address: normalized_token(
            params,
            FROM_TOKEN_ADDRESS,
            registry,
            chain_id,
            operation,
        )?,
        to_token_address: normalized_token(params, TO_TOKEN_ADDRESS, registry, chain_id, operation)?,
        amount,
        wallet_address: params
            .text("walletAddress")
            .unwrap_or_else(|| EVM_NULL_ADDRESS.to_string()),
        enable_estimate: false,
        options: FusionOptions {
            slippage: None,
            fee: params.get("fee").cloned(),
            permit: None,
            is_permit2: params.get("isPermit2").cloned(),
            source: params.get("source").cloned(),
        },
    })
}

pub fn build_fusion_swap_request(
    params: &ParamBag,
    registry: &ChainRegistry,
) -> ProxyResult<FusionQuoteRequest> {
    let operation = UpstreamOperation::BridgeSwap;
    require(params, ParamLocation::Body, &SWAP_REQUIRED)?;

    let chain_id = parse_chain_id(params)?;
    let amount = parse_amount(params)?;

    Ok(FusionQuoteRequest {
        chain_id,
        from_token_address: normalized_token(
            params,
            FROM_TOKEN_ADDRESS,
            registry,
            chain_id,
            operation,
        )?,
        to_token_address: normalized_token(params, TO_TOKEN_ADDRESS, registry, chain_id, operation)?,
        amount,
        wallet_address: params.text(FROM_ADDRESS).unwrap_or_default(),
        enable_estimate: true,
        options: FusionOptions {
            slippage: params.get("slippage").cloned(),
            fee: params.get("fee").cloned(),
            permit: params.get("permit").cloned(),
            is_permit2: params.get("isPermit2").cloned(),
            source: params.get("source").cloned(),
        },
    })
}
