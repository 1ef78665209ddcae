use crate::constants::chains::ChainRegistry;
use crate::error::ModelResult;

/// Pseudo-address aggregators use for a chain's native coin.
pub const NATIVE_TOKEN_EVM_ADDRESS: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";
pub const NATIVE_TOKEN_EVM_ALT_ADDRESS: &str = "0xffffffffffffffffffffffffffffffffffffffff";
pub const EVM_NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

pub const NATIVE_TOKEN_EVM_ADDRESSES: [&str; 2] =
    [NATIVE_TOKEN_EVM_ADDRESS, NATIVE_TOKEN_EVM_ALT_ADDRESS];

/// `0x` followed by exactly 40 hex digits, any casing.
pub fn is_evm_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn is_native_token_evm_address(address: &str) -> bool {
    NATIVE_TOKEN_EVM_ADDRESSES
        .iter()
        .any(|sentinel| sentinel.eq_ignore_ascii_case(address))
}

/// Replaces the native-coin sentinel with the chain's wrapped token contract.
///
/// The chain must be registered even when `address` is an ordinary token, and
/// non-sentinel addresses come back with their casing untouched.
pub fn normalize_token_address(
    registry: &ChainRegistry,
    address: &str,
    chain_id: u32,
) -> ModelResult<String> {
    let chain = registry.resolve(chain_id)?;

    if is_native_token_evm_address(address) {
        Ok(chain.wrapped_native_address.clone())
    } else {
        Ok(address.to_string())
    }
}
