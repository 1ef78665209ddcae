use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub environment: String,
}

/// One candle of the chart endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub from_token: String,
    pub to_token: String,
    pub from_amount: String,
    pub to_amount: String,
    pub status: String,
    pub timestamp: String,
    pub hash: String,
    pub gas_used: String,
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub address: String,
    pub chain_id: u32,
    pub transactions: Vec<HistoryTransaction>,
    pub total_count: u64,
    pub message: String,
    pub suggestion: String,
}

impl HistoryResponse {
    /// Payload returned while no history source is wired in.
    pub fn fallback(address: impl Into<String>, chain_id: u32) -> Self {
        Self {
            address: address.into(),
            chain_id,
            transactions: Vec::new(),
            total_count: 0,
            message: "Transaction history not found".to_string(),
            suggestion: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_omits_missing_details() {
        let value = serde_json::to_value(ErrorBody::new("Route not found")).expect("serializable");
        assert_eq!(value, json!({ "error": "Route not found" }));
    }

    #[test]
    fn test_history_fallback_shape() {
        let value = serde_json::to_value(HistoryResponse::fallback("0xabc", 1))
            .expect("serializable");

        assert_eq!(
            value,
            json!({
                "address": "0xabc",
                "chainId": 1,
                "transactions": [],
                "totalCount": 0,
                "message": "Transaction history not found",
                "suggestion": "",
            })
        );
    }
}
