//! Checks shared by the outbound request builders.
//!
//! Required fields are checked before anything else so an invalid request
//! never reaches normalization or the network.

use error_stack::report;
use swap_models::constants::chains::ChainRegistry;
use swap_models::constants::tokens::normalize_token_address;
use swap_models::models::params::ParamBag;

use crate::error::{Error, ModelResultExt as _, ParamLocation, ProxyResult};
use crate::routers::UpstreamOperation;

pub const FROM_TOKEN_ADDRESS: &str = "fromTokenAddress";
pub const TO_TOKEN_ADDRESS: &str = "toTokenAddress";
pub const AMOUNT: &str = "amount";
pub const CHAIN_ID: &str = "chainId";
pub const FROM_ADDRESS: &str = "fromAddress";
pub const SLIPPAGE: &str = "slippage";

pub fn require(params: &ParamBag, location: ParamLocation, required: &[&str]) -> ProxyResult<()> {
    let missing = params.missing(required);
    if missing.is_empty() {
        return Ok(());
    }

    Err(report!(Error::MissingParameter {
        location,
        fields: missing.into_iter().map(str::to_string).collect(),
    }))
}

pub fn parse_chain_id(params: &ParamBag) -> ProxyResult<u32> {
    let raw = required_text(params, CHAIN_ID)?;
    raw.trim().parse::<u32>().map_err(|_| {
        report!(Error::InvalidParameter(format!(
            "chainId must be a positive integer, got {raw:?}"
        )))
    })
}

/// Amounts are integers in the token's smallest unit, kept as decimal text.
pub fn parse_amount(params: &ParamBag) -> ProxyResult<String> {
    let raw = required_text(params, AMOUNT)?;
    if is_unsigned_integer(&raw) {
        Ok(raw)
    } else {
        Err(report!(Error::InvalidParameter(format!(
            "amount must be a non-negative integer in the token's smallest unit, got {raw:?}"
        ))))
    }
}

pub fn normalized_token(
    params: &ParamBag,
    name: &str,
    registry: &ChainRegistry,
    chain_id: u32,
    operation: UpstreamOperation,
) -> ProxyResult<String> {
    let address = required_text(params, name)?;
    normalize_token_address(registry, &address, chain_id).for_operation(operation)
}

pub fn required_text(params: &ParamBag, name: &str) -> ProxyResult<String> {
    params.text(name).ok_or_else(|| {
        report!(Error::MissingParameter {
            location: ParamLocation::Any,
            fields: vec![name.to_string()],
        })
    })
}

fn is_unsigned_integer(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}
