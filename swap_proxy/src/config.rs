use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use error_stack::{ResultExt as _, report};

use crate::error::{Error, ProxyResult};
use crate::routers::constants::{
    BASE_1INCH_FUSION_API_URL, BASE_1INCH_PRICE_API_URL, BASE_1INCH_SWAP_API_URL,
    DEFAULT_UPSTREAM_TIMEOUT_SECS,
};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Secret string whose `Debug` never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_key: ApiKey,
    pub swap_api_url: String,
    pub fusion_api_url: String,
    pub price_api_url: String,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Default endpoints with the given credential.
    pub fn with_api_key(api_key: ApiKey) -> Self {
        Self {
            api_key,
            swap_api_url: BASE_1INCH_SWAP_API_URL.to_string(),
            fusion_api_url: BASE_1INCH_FUSION_API_URL.to_string(),
            price_api_url: BASE_1INCH_PRICE_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Reported by `/health`
    pub environment: String,
    pub log_format: LogFormat,
    pub upstream: UpstreamConfig,
    /// Empty disables the Basic-auth check
    pub shared_api_keys: Vec<ApiKey>,
    pub chain_registry_path: Option<PathBuf>,
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> ProxyResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ProxyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .change_context(Error::ConfigError(format!("PORT is not a valid port: {raw}")))?,
            None => DEFAULT_PORT,
        };
        let host = var("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .change_context(Error::ConfigError(format!(
                "BIND_HOST is not a valid IP address: {host}"
            )))?;

        let environment = var("NODE_ENV")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => {
                return Err(report!(Error::ConfigError(format!(
                    "LOG_FORMAT must be json or pretty, got {other}"
                ))));
            }
            None if environment == "production" => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        let api_key = var("INCH_API_KEY")
            .map(ApiKey::new)
            .ok_or_else(|| report!(Error::ConfigError("INCH_API_KEY is not set".to_string())))?;

        let mut upstream = UpstreamConfig::with_api_key(api_key);
        if let Some(url) = var("INCH_SWAP_API_URL") {
            upstream.swap_api_url = url;
        }
        if let Some(url) = var("INCH_FUSION_API_URL") {
            upstream.fusion_api_url = url;
        }
        if let Some(url) = var("INCH_PRICE_API_URL") {
            upstream.price_api_url = url;
        }
        if let Some(raw) = var("UPSTREAM_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().change_context(Error::ConfigError(format!(
                "UPSTREAM_TIMEOUT_SECS is not a number of seconds: {raw}"
            )))?;
            if secs == 0 {
                return Err(report!(Error::ConfigError(
                    "UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string()
                )));
            }
            upstream.timeout = Duration::from_secs(secs);
        }

        let shared_api_keys = var("SHARED_API_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(ApiKey::new)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            environment,
            log_format,
            upstream,
            shared_api_keys,
            chain_registry_path: var("CHAIN_REGISTRY_PATH").map(PathBuf::from),
        })
    }

    pub fn auth_enabled(&self) -> bool {
        !self.shared_api_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("INCH_API_KEY", "secret")])).expect("valid");

        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().expect("addr"));
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.upstream.swap_api_url, BASE_1INCH_SWAP_API_URL);
        assert_eq!(config.upstream.timeout, Duration::from_secs(15));
        assert!(!config.auth_enabled());
        assert!(config.chain_registry_path.is_none());
    }

    #[test]
    fn test_api_key_is_required() {
        let err = Config::from_lookup(lookup(&[("PORT", "8080")])).expect_err("no key");
        assert!(matches!(err.current_context(), Error::ConfigError(_)));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("INCH_API_KEY", "secret"),
            ("PORT", "8080"),
            ("BIND_HOST", "127.0.0.1"),
            ("NODE_ENV", "production"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("SHARED_API_KEYS", " alpha , ,beta"),
            ("INCH_FUSION_API_URL", "http://localhost:9000/fusion"),
        ]))
        .expect("valid");

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().expect("addr"));
        assert_eq!(config.environment, "production");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.upstream.timeout, Duration::from_secs(3));
        assert_eq!(
            config.shared_api_keys,
            vec![ApiKey::new("alpha"), ApiKey::new("beta")]
        );
        assert_eq!(config.upstream.fusion_api_url, "http://localhost:9000/fusion");
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("INCH_API_KEY", "secret"), ("PORT", "http")],
            [("INCH_API_KEY", "secret"), ("UPSTREAM_TIMEOUT_SECS", "0")],
            [("INCH_API_KEY", "secret"), ("LOG_FORMAT", "xml")],
        ] {
            assert!(Config::from_lookup(lookup(&vars)).is_err(), "{vars:?}");
        }
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        assert!(!format!("{key:?}").contains("super-secret"));
        assert_eq!(key.expose(), "super-secret");
    }
}
