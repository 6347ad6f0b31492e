//! Deployed-contract metadata and the lookup seam used by the decode path.

use crate::abi::ContractAbi;
use serde::{Deserialize, Serialize};

/// Lowercase an address and keep the 0x prefix off for comparisons.
pub fn normalize_address(address: &str) -> String {
    address
        .strip_prefix("0x")
        .unwrap_or(address)
        .to_lowercase()
}

/// Registry entry describing one deployed contract.
///
/// Created by a deployment flow (external to this core) and registered via
/// `ContractRegistry::add`; immutable once stored unless an overwrite is
/// explicitly requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMeta {
    /// Human-assigned name, unique per registry
    pub alias: String,
    /// Canonical contract address — the registry's primary key
    pub address: String,
    /// Deployment transaction hash
    #[serde(default)]
    pub tx_hash: String,
    /// Raw ABI JSON text as supplied at registration
    #[serde(rename = "abi", default)]
    pub abi_json: String,
    /// Parsed event surface; populated by the registry, never serialized
    #[serde(skip)]
    pub abi: ContractAbi,
    #[serde(default)]
    pub bytecode: String,
    #[serde(default)]
    pub owner: String,
    /// Registration time (Unix seconds); filled in when zero
    #[serde(default)]
    pub timestamp: i64,
}

impl ContractMeta {
    /// Copy with the heavy payload fields cleared, for list views.
    pub fn stripped(&self) -> ContractMeta {
        ContractMeta {
            abi_json: String::new(),
            bytecode: String::new(),
            abi: ContractAbi::default(),
            ..self.clone()
        }
    }
}

/// Read-only contract lookup used by decoders.
/// The concrete registry lives in `logcast-registry`.
pub trait ContractLookup: Send + Sync {
    /// Look up metadata by emitting address (case-insensitive).
    fn lookup(&self, address: &str) -> Option<ContractMeta>;
}
