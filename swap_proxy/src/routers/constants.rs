// https://portal.1inch.dev/documentation/apis/swap/classic-swap/introduction
pub const BASE_1INCH_SWAP_API_URL: &str = "https://api.1inch.dev/swap/v5.0";

// https://portal.1inch.dev/documentation/apis/swap/intent-swap/introduction
pub const BASE_1INCH_FUSION_API_URL: &str = "https://api.1inch.dev/fusion/quoter/v2.0";

// https://portal.1inch.dev/documentation/apis/spot-price/introduction
pub const BASE_1INCH_PRICE_API_URL: &str = "https://api.1inch.dev/price/v1.1";

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;
