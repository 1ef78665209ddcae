pub mod constants;
pub mod fusion;
pub mod one_inch;
pub mod params;

use std::fmt;

use error_stack::Report;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use swap_models::network::http::read_json_response;
use tracing::debug;

use crate::config::{ApiKey, UpstreamConfig};
use crate::error::{Error, ModelResultExt as _, ProxyResult};

/// Upstream call families; used to tag errors so the caller knows which one failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpstreamOperation {
    Quote,
    Swap,
    BridgeQuote,
    BridgeSwap,
    Chart,
}

impl UpstreamOperation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quote => "1inch",
            Self::Swap => "1inch Swap",
            Self::BridgeQuote => "1inch Fusion",
            Self::BridgeSwap => "1inch Fusion Swap",
            Self::Chart => "1inch Chart",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Quote => "Failed to get quote",
            Self::Swap => "Failed to execute swap",
            Self::BridgeQuote => "Failed to get bridge quote",
            Self::BridgeSwap => "Failed to execute bridge swap",
            Self::Chart => "Failed to get chart data",
        }
    }
}

impl fmt::Display for UpstreamOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quote => write!(f, "quote"),
            Self::Swap => write!(f, "swap"),
            Self::BridgeQuote => write!(f, "bridge_quote"),
            Self::BridgeSwap => write!(f, "bridge_swap"),
            Self::Chart => write!(f, "chart"),
        }
    }
}

/// Shared HTTP client for the aggregator APIs.
///
/// One request per call, no retries. The bearer key is attached here and
/// nowhere else.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    api_key: ApiKey,
    swap_api_url: String,
    fusion_api_url: String,
    price_api_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> ProxyResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                Report::new(e).change_context(Error::ConfigError(
                    "failed to build upstream HTTP client".to_string(),
                ))
            })?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            swap_api_url: trim_base(&config.swap_api_url),
            fusion_api_url: trim_base(&config.fusion_api_url),
            price_api_url: trim_base(&config.price_api_url),
        })
    }

    pub fn swap_api_url(&self) -> &str {
        &self.swap_api_url
    }

    pub fn fusion_api_url(&self) -> &str {
        &self.fusion_api_url
    }

    pub fn price_api_url(&self) -> &str {
        &self.price_api_url
    }

    pub async fn get_json(&self, operation: UpstreamOperation, url: Url) -> ProxyResult<Value> {
        debug!(%operation, host = ?url.host_str(), path = url.path(), "Sending upstream request");
        self.send_json(operation, self.http.get(url)).await
    }

    /// POSTs `body` as JSON; the reply is read like a GET reply.
    pub async fn post_json(
        &self,
        operation: UpstreamOperation,
        url: Url,
        body: &Value,
    ) -> ProxyResult<Value> {
        debug!(%operation, host = ?url.host_str(), path = url.path(), "Sending upstream POST request");
        self.send_json(operation, self.http.post(url).json(body)).await
    }

    async fn send_json(
        &self,
        operation: UpstreamOperation,
        request: RequestBuilder,
    ) -> ProxyResult<Value> {
        let response = request
            .bearer_auth(self.api_key.expose())
            .send()
            .await
            .map_err(|e| {
                let message = describe_reqwest_error(&e);
                Report::new(e).change_context(Error::InternalError { operation, message })
            })?;

        read_json_response(response).await.for_operation(operation)
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Caller-safe description of a transport failure; never includes the URL.
fn describe_reqwest_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "upstream request timed out".to_string()
    } else if error.is_connect() {
        "failed to connect to upstream".to_string()
    } else if error.is_body() || error.is_decode() {
        "failed to read upstream response".to_string()
    } else {
        "upstream request failed".to_string()
    }
}
