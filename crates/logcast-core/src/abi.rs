//! Typed ABI descriptor stored in the contract registry.
//!
//! `ContractAbi` is the in-memory representation of a contract's event
//! surface, parsed once at registration time from raw ABI JSON (the parser
//! lives in `logcast-registry`). Selectors are precomputed so the decode
//! path is a string compare per candidate event.

use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

/// Compute the keccak-256 hash of an event signature string.
/// Input: `"EventName(type1,type2,...)"` — the canonical ABI signature.
pub fn keccak256_signature(signature: &str) -> String {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(signature.as_bytes());
    hasher.finalize(&mut output);
    format!("0x{}", hex::encode(output))
}

/// A single event parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    /// Parameter name, e.g. "from"
    pub name: String,
    /// Canonical Solidity type string, e.g. "uint256", "(address,uint24)"
    pub ty: String,
    /// Whether the value is carried in a topic rather than the data payload
    pub indexed: bool,
}

/// A named event extracted from a contract ABI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDef {
    /// Event name, e.g. "Transfer"
    pub name: String,
    /// Parameters in ABI declaration order (order matters for decoding)
    pub inputs: Vec<ParamDef>,
    /// Precomputed keccak-256 of the canonical signature (0x-hex)
    pub selector: String,
}

impl EventDef {
    /// Canonical ABI signature string, e.g. `"Transfer(address,address,uint256)"`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Parameters carried in topics[1..], in declaration order.
    pub fn indexed_inputs(&self) -> Vec<&ParamDef> {
        self.inputs.iter().filter(|p| p.indexed).collect()
    }

    /// Parameters carried in the data payload, in declaration order.
    pub fn data_inputs(&self) -> Vec<&ParamDef> {
        self.inputs.iter().filter(|p| !p.indexed).collect()
    }
}

/// The event surface of one contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractAbi {
    pub events: Vec<EventDef>,
}

impl ContractAbi {
    /// Find the event whose selector equals the given signature topic.
    ///
    /// First match in declaration order wins; if two events in the same ABI
    /// collide on a selector the earlier declaration shadows the later one.
    pub fn event_for_topic(&self, topic0: &str) -> Option<&EventDef> {
        self.events
            .iter()
            .find(|e| e.selector.eq_ignore_ascii_case(topic0))
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
