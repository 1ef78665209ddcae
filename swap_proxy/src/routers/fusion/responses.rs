use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subset of the fusion quoter reply the envelope needs.
///
/// Everything else the quoter sends is dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionQuoteResponse {
    #[serde(default)]
    pub quote_id: Value,
    #[serde(default)]
    pub from_token_amount: Value,
    #[serde(default)]
    pub to_token_amount: Value,
    #[serde(default, alias = "recommended_preset")]
    pub recommended_preset: Value,
    #[serde(default)]
    pub presets: Value,
    #[serde(default)]
    pub settlement_address: Value,
    #[serde(default)]
    pub whitelist: Value,
    #[serde(default)]
    pub prices: Value,
    #[serde(default)]
    pub volume: Value,
}

impl FusionQuoteResponse {
    fn recommended(&self) -> Option<&Value> {
        let name = self.recommended_preset.as_str()?;
        self.presets.get(name)
    }

    /// Gas bump estimate of the recommended preset.
    pub fn estimated_gas(&self) -> Value {
        self.recommended()
            .and_then(|preset| preset.get("gasCost"))
            .and_then(|cost| cost.get("gasBumpEstimate"))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn auction_duration(&self) -> Value {
        self.recommended()
            .and_then(|preset| preset.get("auctionDuration"))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// Order built by the quoter for the maker to sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionOrder {
    /// EIP-712 payload
    #[serde(default, alias = "order")]
    pub typed_data: Value,
    #[serde(default, alias = "hash")]
    pub order_hash: Value,
    #[serde(default)]
    pub extension: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRef {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionExtension {
    pub quote_id: Value,
    pub recommended_preset: Value,
    pub presets: Value,
    pub settlement_address: Value,
    pub whitelist: Value,
    pub auction_duration: Value,
    pub prices: Value,
    pub volume: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<FusionOrder>,
}

/// Classic-shaped quote body with the fusion specifics under `fusion`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionEnvelope {
    pub from_token: TokenRef,
    pub to_token: TokenRef,
    pub from_token_amount: Value,
    pub to_token_amount: Value,
    pub estimated_gas: Value,
    /// Fusion orders are filled by resolvers, so no route is known upfront
    pub protocols: Vec<Value>,
    pub fusion: FusionExtension,
}
