use error_stack::Report;
use serde::Serialize;
use serde_json::{Value, json};
use swap_models::constants::chains::ChainRegistry;
use swap_models::models::params::{LooseValue, ParamBag};

use crate::error::{Error, ParamLocation, ProxyResult};
use crate::routers::UpstreamOperation;
use crate::routers::params::{
    AMOUNT, CHAIN_ID, FROM_ADDRESS, FROM_TOKEN_ADDRESS, SLIPPAGE, TO_TOKEN_ADDRESS,
    normalized_token, parse_amount, parse_chain_id, require,
};

const QUOTE_REQUIRED: [&str; 4] = [FROM_TOKEN_ADDRESS, TO_TOKEN_ADDRESS, AMOUNT, CHAIN_ID];
const SWAP_REQUIRED: [&str; 6] = [
    FROM_TOKEN_ADDRESS,
    TO_TOKEN_ADDRESS,
    AMOUNT,
    FROM_ADDRESS,
    SLIPPAGE,
    CHAIN_ID,
];

/// Routing, gas and protocol controls shared by quote and swap.
///
/// Every field is forwarded only when the caller sent it; the aggregator
/// applies its own defaults to anything left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteControls {
    /// Percent, 0 to 50
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocols: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_protocols: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector_tokens: Option<LooseValue>,
    /// Referrer fee percent, 0 to 3
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<LooseValue>,
    /// Wei
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_level: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_route_parts: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_tokens_info: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_protocols: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_gas: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_partial_fill: Option<LooseValue>,
    /// Excludes Unoswap so fee-on-transfer tokens work
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_permit2: Option<LooseValue>,
}

impl RouteControls {
    pub fn collect(params: &ParamBag) -> Self {
        let take = |name: &str| params.get(name).cloned();

        Self {
            slippage: take(SLIPPAGE),
            protocols: take("protocols"),
            excluded_protocols: take("excludedProtocols"),
            connector_tokens: take("connectorTokens"),
            fee: take("fee"),
            gas_price: take("gasPrice"),
            complexity_level: take("complexityLevel"),
            gas_limit: take("gasLimit"),
            main_route_parts: take("mainRouteParts"),
            parts: take("parts"),
            include_tokens_info: take("includeTokensInfo"),
            include_protocols: take("includeProtocols"),
            include_gas: take("includeGas"),
            allow_partial_fill: take("allowPartialFill"),
            compatibility: take("compatibility"),
            use_permit2: take("usePermit2"),
        }
    }
}

/// Swap-only options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapExtras {
    /// Recipient of the bought token; defaults to `fromAddress` upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer_address: Option<LooseValue>,
    /// EIP-2612 permit calldata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_estimate: Option<LooseValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burn_chi: Option<LooseValue>,
}

impl SwapExtras {
    pub fn collect(params: &ParamBag) -> Self {
        let take = |name: &str| params.get(name).cloned();

        Self {
            receiver: take("receiver"),
            referrer_address: take("referrerAddress"),
            permit: take("permit"),
            disable_estimate: take("disableEstimate"),
            burn_chi: take("burnChi"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneInchQuoteRequest {
    pub chain_id: u32,
    pub from_token_address: String,
    pub to_token_address: String,
    /// Smallest-unit integer, decimal text
    pub amount: String,
    pub controls: RouteControls,
}

impl OneInchQuoteRequest {
    pub fn to_query(&self) -> ProxyResult<Value> {
        let mut query = json!({
            "fromTokenAddress": self.from_token_address,
            "toTokenAddress": self.to_token_address,
            "amount": self.amount,
        });
        merge_optional(&mut query, &self.controls, UpstreamOperation::Quote)?;

        Ok(query)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneInchSwapRequest {
    pub chain_id: u32,
    pub from_token_address: String,
    pub to_token_address: String,
    pub amount: String,
    /// Seller; must have approved the router for `amount`
    pub from_address: String,
    pub controls: RouteControls,
    pub extras: SwapExtras,
}

impl OneInchSwapRequest {
    pub fn to_query(&self) -> ProxyResult<Value> {
        let mut query = json!({
            "fromTokenAddress": self.from_token_address,
            "toTokenAddress": self.to_token_address,
            "amount": self.amount,
            "fromAddress": self.from_address,
        });
        merge_optional(&mut query, &self.controls, UpstreamOperation::Swap)?;
        merge_optional(&mut query, &self.extras, UpstreamOperation::Swap)?;

        Ok(query)
    }
}

pub fn build_quote_request(
    params: &ParamBag,
    registry: &ChainRegistry,
) -> ProxyResult<OneInchQuoteRequest> {
    let operation = UpstreamOperation::Quote;
    require(params, ParamLocation::Query, &QUOTE_REQUIRED)?;

    let chain_id = parse_chain_id(params)?;
    let amount = parse_amount(params)?;

    Ok(OneInchQuoteRequest {
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
        controls: RouteControls::collect(params),
    })
}

pub fn build_swap_request(
    params: &ParamBag,
    registry: &ChainRegistry,
) -> ProxyResult<OneInchSwapRequest> {
    let operation = UpstreamOperation::Swap;
    require(params, ParamLocation::Body, &SWAP_REQUIRED)?;

    let chain_id = parse_chain_id(params)?;
    let amount = parse_amount(params)?;

    Ok(OneInchSwapRequest {
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
        from_address: params.text(FROM_ADDRESS).unwrap_or_default(),
        controls: RouteControls::collect(params),
        extras: SwapExtras::collect(params),
    })
}

/// Adds the present members of `optional` to the `query` object.
fn merge_optional<T: Serialize>(
    query: &mut Value,
    optional: &T,
    operation: UpstreamOperation,
) -> ProxyResult<()> {
    let value = serde_json::to_value(optional).map_err(|e| {
        Report::new(e).change_context(Error::InternalError {
            operation,
            message: "failed to encode request parameters".to_string(),
        })
    })?;

    if let (Value::Object(target), Value::Object(source)) = (query, value) {
        target.extend(source);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";
    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const TAKER: &str = "0x9ecDC9aF2a8254DdE8bbce8778eFAe695044cC9F";

    fn query_bag(pairs: &[(&str, &str)]) -> ParamBag {
        ParamBag::from_query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_quote_substitutes_wrapped_native_token() {
        let params = query_bag(&[
            ("fromTokenAddress", NATIVE),
            ("toTokenAddress", USDC),
            ("amount", "1000000000000000000"),
            ("chainId", "1"),
        ]);

        let request = build_quote_request(&params, &ChainRegistry::default()).expect("valid");
        assert_eq!(request.from_token_address, WETH);
        assert_eq!(request.to_token_address, USDC);

        let query = request.to_query().expect("encodable");
        assert_eq!(
            query,
            json!({
                "fromTokenAddress": WETH,
                "toTokenAddress": USDC,
                "amount": "1000000000000000000",
            })
        );
    }

    #[test]
    fn test_quote_omits_absent_optional_fields() {
        let params = query_bag(&[
            ("fromTokenAddress", USDC),
            ("toTokenAddress", WETH),
            ("amount", "1000000"),
            ("chainId", "1"),
            ("slippage", "1"),
            ("includeGas", "true"),
            ("gasPrice", ""),
        ]);

        let query = build_quote_request(&params, &ChainRegistry::default())
            .expect("valid")
            .to_query()
            .expect("encodable");
        let object = query.as_object().expect("object");

        assert_eq!(object.get("slippage"), Some(&json!("1")));
        assert_eq!(object.get("includeGas"), Some(&json!("true")));
        for absent in [
            "gasPrice",
            "protocols",
            "complexityLevel",
            "gasLimit",
            "parts",
            "usePermit2",
        ] {
            assert!(!object.contains_key(absent), "{absent} must be omitted");
        }
        assert_eq!(object.len(), 5);
    }

    #[test]
    fn test_quote_missing_fields_fail_before_normalization() {
        // chainId 999 would fail normalization; the missing check comes first.
        let params = query_bag(&[("fromTokenAddress", NATIVE), ("chainId", "999")]);

        let err = build_quote_request(&params, &ChainRegistry::default())
            .expect_err("fields missing");
        assert_eq!(
            err.current_context(),
            &Error::MissingParameter {
                location: ParamLocation::Query,
                fields: vec!["toTokenAddress".to_string(), "amount".to_string()],
            }
        );
    }

    #[test]
    fn test_swap_requires_from_address() {
        let params = ParamBag::from_json(&json!({
            "fromTokenAddress": USDC,
            "toTokenAddress": WETH,
            "amount": "1000000",
            "slippage": 1,
            "chainId": 1,
        }))
        .expect("object body");

        let err = build_swap_request(&params, &ChainRegistry::default())
            .expect_err("fromAddress missing");
        assert_eq!(
            err.current_context(),
            &Error::MissingParameter {
                location: ParamLocation::Body,
                fields: vec!["fromAddress".to_string()],
            }
        );
        assert_eq!(
            err.current_context().to_string(),
            "Missing required body parameters"
        );
    }

    #[test]
    fn test_swap_forwards_numeric_fields_exactly() {
        let body: Value = serde_json::from_str(&format!(
            r#"{{
                "fromTokenAddress": "{NATIVE}",
                "toTokenAddress": "{USDC}",
                "amount": 25000000000000000000000,
                "fromAddress": "{TAKER}",
                "slippage": 0.5,
                "chainId": 1,
                "gasPrice": 123456789012345678901,
                "allowPartialFill": false
            }}"#
        ))
        .expect("valid json");
        let params = ParamBag::from_json(&body).expect("object body");

        let request = build_swap_request(&params, &ChainRegistry::default()).expect("valid");
        assert_eq!(request.amount, "25000000000000000000000");
        assert_eq!(request.from_token_address, WETH);
        assert_eq!(request.from_address, TAKER);

        let query = request.to_query().expect("encodable");
        assert_eq!(query["slippage"].to_string(), "0.5");
        assert_eq!(query["gasPrice"].to_string(), "123456789012345678901");
        assert_eq!(query["allowPartialFill"], json!(false));
        assert!(query.get("receiver").is_none());
        assert!(query.get("referrerAddress").is_none());
    }

    #[test]
    fn test_swap_requires_slippage() {
        for slippage in [json!(null), json!(""), json!("  ")] {
            let params = ParamBag::from_json(&json!({
                "fromTokenAddress": USDC,
                "toTokenAddress": WETH,
                "amount": "1000000",
                "fromAddress": TAKER,
                "slippage": slippage,
                "chainId": "56",
            }))
            .expect("object body");

            let err = build_swap_request(&params, &ChainRegistry::default())
                .expect_err("slippage missing");
            assert_eq!(
                err.current_context(),
                &Error::MissingParameter {
                    location: ParamLocation::Body,
                    fields: vec!["slippage".to_string()],
                }
            );
        }
    }

    #[test]
    fn test_unsupported_chain_is_rejected() {
        let params = query_bag(&[
            ("fromTokenAddress", USDC),
            ("toTokenAddress", WETH),
            ("amount", "1"),
            ("chainId", "999"),
        ]);

        let err = build_quote_request(&params, &ChainRegistry::default())
            .expect_err("999 is not registered");
        assert!(matches!(
            err.current_context(),
            Error::UnsupportedChain { chain_id: 999, .. }
        ));
    }
}
