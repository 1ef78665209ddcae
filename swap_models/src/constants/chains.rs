use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use error_stack::{ResultExt as _, report};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::constants::tokens::is_evm_address;
use crate::error::{Error, ModelResult};

/// Network identifiers understood by the aggregator SDKs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NetworkKey {
    Ethereum,
    Binance,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
    Avalanche,
    Gnosis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: u32,
    pub network: NetworkKey,
    /// ERC-20 contract wrapping the chain's native coin
    pub wrapped_native_address: String,
}

const DEFAULT_CHAINS: [(u32, NetworkKey, &str); 8] = [
    (
        1,
        NetworkKey::Ethereum,
        "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
    ),
    (
        56,
        NetworkKey::Binance,
        "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
    ),
    (
        137,
        NetworkKey::Polygon,
        "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270",
    ),
    (
        42161,
        NetworkKey::Arbitrum,
        "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1",
    ),
    (
        10,
        NetworkKey::Optimism,
        "0x4200000000000000000000000000000000000006",
    ),
    (
        8453,
        NetworkKey::Base,
        "0x4200000000000000000000000000000000000006",
    ),
    (
        43114,
        NetworkKey::Avalanche,
        "0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7",
    ),
    (
        100,
        NetworkKey::Gnosis,
        "0xe91D153E0b41518A2Ce8Dd3D7944Fa863463a97d",
    ),
];

/// Read-only table of the chains this deployment serves.
///
/// Every component that needs chain-specific data goes through `resolve`, so
/// adding a chain only means adding a descriptor.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: BTreeMap<u32, ChainDescriptor>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        let chains = DEFAULT_CHAINS
            .iter()
            .map(|(chain_id, network, wrapped)| {
                (
                    *chain_id,
                    ChainDescriptor {
                        chain_id: *chain_id,
                        network: *network,
                        wrapped_native_address: wrapped.to_string(),
                    },
                )
            })
            .collect();

        Self { chains }
    }
}

impl ChainRegistry {
    pub fn from_descriptors(descriptors: Vec<ChainDescriptor>) -> ModelResult<Self> {
        if descriptors.is_empty() {
            return Err(report!(Error::RegistryError(
                "chain registry must contain at least one chain".to_string()
            )));
        }

        let mut chains = BTreeMap::new();
        for descriptor in descriptors {
            if !is_evm_address(&descriptor.wrapped_native_address) {
                return Err(report!(Error::RegistryError(format!(
                    "invalid wrapped token address for chain {}: {}",
                    descriptor.chain_id, descriptor.wrapped_native_address
                ))));
            }
            let chain_id = descriptor.chain_id;
            if chains.insert(chain_id, descriptor).is_some() {
                return Err(report!(Error::RegistryError(format!(
                    "duplicate descriptor for chain {chain_id}"
                ))));
            }
        }

        Ok(Self { chains })
    }

    /// Loads a JSON array of chain descriptors.
    pub fn from_json_file(path: &Path) -> ModelResult<Self> {
        let raw = fs::read_to_string(path)
            .change_context(Error::RegistryError("failed to read chain table".to_string()))
            .attach_printable_lazy(|| format!("path: {}", path.display()))?;

        let descriptors: Vec<ChainDescriptor> = serde_json::from_str(&raw)
            .change_context(Error::SerdeDeserialize(
                "chain table is not a valid descriptor list".to_string(),
            ))
            .attach_printable_lazy(|| format!("path: {}", path.display()))?;

        Self::from_descriptors(descriptors)
    }

    pub fn resolve(&self, chain_id: u32) -> ModelResult<&ChainDescriptor> {
        self.chains.get(&chain_id).ok_or_else(|| {
            report!(Error::UnsupportedChain {
                chain_id,
                supported: self.supported_chain_ids(),
            })
        })
    }

    /// Supported chain ids in ascending order.
    pub fn supported_chain_ids(&self) -> Vec<u32> {
        self.chains.keys().copied().collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.chains.values()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
