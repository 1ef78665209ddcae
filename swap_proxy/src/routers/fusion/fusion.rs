use error_stack::Report;
use serde_json::Value;
use swap_models::network::http::url_with_sorted_query;
use tracing::debug;

use crate::error::{Error, ModelResultExt as _, ProxyResult};
use crate::routers::fusion::requests::{FusionBuildQuery, FusionQuoteRequest};
use crate::routers::fusion::responses::{
    FusionEnvelope, FusionExtension, FusionOrder, FusionQuoteResponse, TokenRef,
};
use crate::routers::{UpstreamClient, UpstreamOperation};

/// Quote-only fusion call, projected to the common envelope.
pub async fn fusion_get_quote(
    client: &UpstreamClient,
    request: &FusionQuoteRequest,
) -> ProxyResult<FusionEnvelope> {
    let (_, quote) = fusion_quote_receive(client, request, UpstreamOperation::BridgeQuote).await?;
    Ok(project_envelope(quote, request, None))
}

/// Quotes for `walletAddress` and has the quoter build the order from that
/// quote. The caller signs and submits the order itself.
pub async fn fusion_prepare_swap(
    client: &UpstreamClient,
    request: &FusionQuoteRequest,
) -> ProxyResult<FusionEnvelope> {
    let operation = UpstreamOperation::BridgeSwap;
    let (raw_quote, quote) = fusion_quote_receive(client, request, operation).await?;

    let query = FusionBuildQuery::new(request, &quote.recommended_preset).to_query(operation)?;
    let base = format!("{}/{}/quote/build", client.fusion_api_url(), request.chain_id);
    let url = url_with_sorted_query(&base, &query).for_operation(operation)?;

    let raw_order = client.post_json(operation, url, &raw_quote).await?;
    let order = serde_json::from_value::<FusionOrder>(raw_order).map_err(|e| {
        Report::new(e).change_context(Error::InternalError {
            operation,
            message: "unexpected fusion order build response".to_string(),
        })
    })?;
    debug!(order_hash = %order.order_hash, "Built fusion order");

    let mut envelope = project_envelope(quote, request, Some(request.wallet_address.clone()));
    envelope.fusion.order = Some(order);
    Ok(envelope)
}

/// Returns the quote both as received and parsed; the raw form is what the
/// order build call expects back.
async fn fusion_quote_receive(
    client: &UpstreamClient,
    request: &FusionQuoteRequest,
    operation: UpstreamOperation,
) -> ProxyResult<(Value, FusionQuoteResponse)> {
    let query = request.to_query(operation)?;

    let chain = request.chain_id;
    let base = format!("{}/{chain}/quote/receive", client.fusion_api_url());
    let url = url_with_sorted_query(&base, &query).for_operation(operation)?;

    let raw = client.get_json(operation, url).await?;

    let quote = serde_json::from_value::<FusionQuoteResponse>(raw.clone()).map_err(|e| {
        Report::new(e).change_context(Error::InternalError {
            operation,
            message: "unexpected fusion quoter response".to_string(),
        })
    })?;
    Ok((raw, quote))
}

pub fn project_envelope(
    quote: FusionQuoteResponse,
    request: &FusionQuoteRequest,
    wallet_address: Option<String>,
) -> FusionEnvelope {
    let estimated_gas = quote.estimated_gas();
    let auction_duration = quote.auction_duration();
    debug!(
        quote_id = %quote.quote_id,
        preset = %quote.recommended_preset,
        "Projecting fusion quote"
    );

    let from_token_amount = match quote.from_token_amount {
        Value::Null => Value::String(request.amount.clone()),
        amount => amount,
    };

    FusionEnvelope {
        from_token: TokenRef {
            address: request.from_token_address.clone(),
        },
        to_token: TokenRef {
            address: request.to_token_address.clone(),
        },
        from_token_amount,
        to_token_amount: quote.to_token_amount,
        estimated_gas,
        protocols: Vec::new(),
        fusion: FusionExtension {
            quote_id: quote.quote_id,
            recommended_preset: quote.recommended_preset,
            presets: quote.presets,
            settlement_address: quote.settlement_address,
            whitelist: quote.whitelist,
            auction_duration,
            prices: quote.prices,
            volume: quote.volume,
            wallet_address,
            order: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routers::fusion::requests::FusionOptions;
    use crate::tests::{init_tracing_in_tests, upstream_client};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const MAKER: &str = "0x9ecDC9aF2a8254DdE8bbce8778eFAe695044cC9F";

    const QUOTER_BODY: &str = r#"{
        "quoteId": "b8f3c1d2-5a6e-4f7b-9c0d-1e2f3a4b5c6d",
        "fromTokenAmount": "1000000000000000000",
        "toTokenAmount": "3401234567",
        "recommended_preset": "fast",
        "presets": {
            "fast": {
                "auctionDuration": 180,
                "gasCost": { "gasBumpEstimate": 14, "gasPriceEstimate": "1274" }
            },
            "slow": {
                "auctionDuration": 600,
                "gasCost": { "gasBumpEstimate": 0, "gasPriceEstimate": "0" }
            }
        },
        "settlementAddress": "0xa88800cd213da5ae406ce248380802bd53b47647",
        "whitelist": ["0x3169e2a5b8c1f3f5a8a1e1fa7c3b8b2c6d1c0e9a"],
        "prices": { "usd": { "fromToken": "3402.11", "toToken": "1.0001" } },
        "volume": { "usd": { "fromToken": "3402.11", "toToken": "3401.23" } },
        "marketAmount": "3405000000"
    }"#;

    fn request(wallet: &str, enable_estimate: bool) -> FusionQuoteRequest {
        FusionQuoteRequest {
            chain_id: 1,
            from_token_address: WETH.to_string(),
            to_token_address: USDC.to_string(),
            amount: "1000000000000000000".to_string(),
            wallet_address: wallet.to_string(),
            enable_estimate,
            options: FusionOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_fusion_get_quote_projects_envelope() {
        init_tracing_in_tests();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fusion/quoter/v2.0/1/quote/receive"))
            .and(query_param("fromTokenAddress", WETH))
            .and(query_param("enableEstimate", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(QUOTER_BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = upstream_client(&server.uri());
        let envelope = fusion_get_quote(
            &client,
            &request("0x0000000000000000000000000000000000000000", false),
        )
        .await
        .expect("quote succeeds");

        let value = serde_json::to_value(&envelope).expect("serializable");
        assert_eq!(value["fromToken"], json!({ "address": WETH }));
        assert_eq!(value["toToken"], json!({ "address": USDC }));
        assert_eq!(value["toTokenAmount"], json!("3401234567"));
        assert_eq!(value["estimatedGas"], json!(14));
        assert_eq!(value["protocols"], json!([]));
        assert_eq!(value["fusion"]["recommendedPreset"], json!("fast"));
        assert_eq!(value["fusion"]["auctionDuration"], json!(180));
        assert!(value["fusion"].get("walletAddress").is_none());
        assert!(value.get("marketAmount").is_none());
    }

    const BUILD_BODY: &str = r#"{
        "typedData": {
            "primaryType": "Order",
            "domain": { "name": "1inch Aggregation Router", "version": "6", "chainId": 1 },
            "message": { "maker": "0x9ecdc9af2a8254dde8bbce8778efae695044cc9f", "makingAmount": "1000000000000000000" }
        },
        "orderHash": "0x5b2b5e7b0c5e3f1c1f9e1d8a6f1c7e6a0b3d2c1e4f5a6b7c8d9e0f1a2b3c4d5e",
        "extension": "0x000000cb0000005e"
    }"#;

    #[tokio::test]
    async fn test_fusion_prepare_swap_builds_order() {
        init_tracing_in_tests();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fusion/quoter/v2.0/1/quote/receive"))
            .and(query_param("walletAddress", MAKER))
            .and(query_param("enableEstimate", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(QUOTER_BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/fusion/quoter/v2.0/1/quote/build"))
            .and(query_param("walletAddress", MAKER))
            .and(query_param("preset", "fast"))
            .and(body_partial_json(json!({
                "quoteId": "b8f3c1d2-5a6e-4f7b-9c0d-1e2f3a4b5c6d",
                "marketAmount": "3405000000",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(BUILD_BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = upstream_client(&server.uri());
        let envelope = fusion_prepare_swap(&client, &request(MAKER, true))
            .await
            .expect("swap preparation succeeds");

        assert_eq!(envelope.fusion.wallet_address.as_deref(), Some(MAKER));
        let order = envelope.fusion.order.as_ref().expect("order built");
        assert_eq!(
            order.order_hash,
            json!("0x5b2b5e7b0c5e3f1c1f9e1d8a6f1c7e6a0b3d2c1e4f5a6b7c8d9e0f1a2b3c4d5e")
        );
        assert_eq!(order.extension, json!("0x000000cb0000005e"));
        assert_eq!(order.typed_data["primaryType"], json!("Order"));

        let value = serde_json::to_value(&envelope).expect("serializable");
        assert_eq!(
            value["fusion"]["order"]["typedData"]["domain"]["chainId"],
            json!(1)
        );
        assert!(value["fusion"]["order"]["orderHash"].is_string());
    }

    #[tokio::test]
    async fn test_fusion_order_build_failure_is_reported() {
        init_tracing_in_tests();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fusion/quoter/v2.0/1/quote/receive"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(QUOTER_BODY, "application/json"))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/fusion/quoter/v2.0/1/quote/build"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "description": "quote expired" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = upstream_client(&server.uri());
        let err = fusion_prepare_swap(&client, &request(MAKER, true))
            .await
            .expect_err("build rejected");

        assert_eq!(err.current_context().to_string(), "1inch Fusion Swap API Error");
        assert_eq!(err.current_context().status_code().as_u16(), 400);
    }

    #[test]
    fn test_order_accepts_short_field_names() {
        let order: FusionOrder = serde_json::from_value(json!({
            "order": { "maker": "0x1" },
            "hash": "0xabc",
        }))
        .expect("lenient shape");

        assert_eq!(order.typed_data, json!({ "maker": "0x1" }));
        assert_eq!(order.order_hash, json!("0xabc"));
        assert_eq!(order.extension, Value::Null);
    }

    #[tokio::test]
    async fn test_fusion_errors_carry_bridge_label() {
        init_tracing_in_tests();
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fusion/quoter/v2.0/1/quote/receive"))
            .respond_with(ResponseTemplate::new(400).set_body_string("insufficient liquidity"))
            .mount(&server)
            .await;

        let client = upstream_client(&server.uri());
        let err = fusion_prepare_swap(&client, &request(MAKER, true))
            .await
            .expect_err("upstream rejects");

        assert_eq!(err.current_context().to_string(), "1inch Fusion Swap API Error");
        assert_eq!(err.current_context().status_code().as_u16(), 400);
    }

    #[test]
    fn test_missing_preset_gives_null_gas() {
        let quote: FusionQuoteResponse = serde_json::from_value(json!({
            "quoteId": null,
            "toTokenAmount": "5",
            "recommendedPreset": "custom",
            "presets": { "fast": { "auctionDuration": 180 } }
        }))
        .expect("lenient shape");

        let envelope = project_envelope(quote, &request(MAKER, false), None);
        assert_eq!(envelope.estimated_gas, Value::Null);
        assert_eq!(envelope.fusion.auction_duration, Value::Null);
        assert_eq!(envelope.from_token_amount, json!("1000000000000000000"));
    }
}
