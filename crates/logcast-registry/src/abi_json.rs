//! ABI JSON parsing and validation.
//!
//! Raw ABI text is parsed once, at registration time, into the typed
//! `ContractAbi` descriptor from `logcast-core`. A malformed document
//! rejects the whole registration; nothing is stored.

use alloy_json_abi::JsonAbi;
use logcast_core::abi::{keccak256_signature, ContractAbi, EventDef, ParamDef};
use logcast_core::RegistryError;
use std::collections::HashMap;
use tracing::debug;

/// Parse raw ABI JSON text into the event surface of a contract.
///
/// Accepts the standard compiler-output ABI array. Anonymous events carry
/// no signature topic and are skipped. An ABI whose events collide on a
/// selector (duplicate declarations) is ambiguous and rejected outright
/// rather than resolved by match order.
pub fn parse_abi(text: &str) -> Result<ContractAbi, RegistryError> {
    let json_abi: JsonAbi =
        serde_json::from_str(text).map_err(|e| RegistryError::InvalidAbi {
            reason: e.to_string(),
        })?;

    let mut events = Vec::new();
    for event in json_abi.events() {
        if event.anonymous {
            debug!(event = %event.name, "skipping anonymous event, no signature topic");
            continue;
        }

        let inputs: Vec<ParamDef> = event
            .inputs
            .iter()
            .map(|p| ParamDef {
                name: p.name.clone(),
                ty: p.selector_type().to_string(),
                indexed: p.indexed,
            })
            .collect();

        let mut def = EventDef {
            name: event.name.clone(),
            inputs,
            selector: String::new(),
        };
        def.selector = keccak256_signature(&def.signature());
        events.push(def);
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for event in &events {
        if let Some(prev) = seen.insert(event.selector.as_str(), event.name.as_str()) {
            return Err(RegistryError::InvalidAbi {
                reason: format!(
                    "events '{prev}' and '{}' share selector {}",
                    event.name, event.selector
                ),
            });
        }
    }

    Ok(ContractAbi { events })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {
            "type": "event",
            "name": "Transfer",
            "anonymous": false,
            "inputs": [
                {"name": "from", "type": "address", "indexed": true},
                {"name": "to", "type": "address", "indexed": true},
                {"name": "value", "type": "uint256", "indexed": false}
            ]
        },
        {
            "type": "function",
            "name": "balanceOf",
            "stateMutability": "view",
            "inputs": [{"name": "owner", "type": "address"}],
            "outputs": [{"name": "", "type": "uint256"}]
        }
    ]"#;

    #[test]
    fn extracts_events_only() {
        let abi = parse_abi(ERC20_ABI).unwrap();
        assert_eq!(abi.events.len(), 1);
        assert_eq!(abi.events[0].name, "Transfer");
        assert_eq!(abi.events[0].inputs.len(), 3);
    }

    #[test]
    fn transfer_selector_matches_known_hash() {
        let abi = parse_abi(ERC20_ABI).unwrap();
        assert_eq!(
            abi.events[0].selector,
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn anonymous_events_skipped() {
        let text = r#"[
            {"type": "event", "name": "Hidden", "anonymous": true, "inputs": []}
        ]"#;
        let abi = parse_abi(text).unwrap();
        assert!(abi.is_empty());
    }

    #[test]
    fn malformed_json_rejected() {
        let err = parse_abi("not json").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAbi { .. }));
    }

    #[test]
    fn empty_abi_is_fine() {
        let abi = parse_abi("[]").unwrap();
        assert!(abi.is_empty());
    }

    #[test]
    fn duplicate_event_declaration_rejected() {
        let text = r#"[
            {"type": "event", "name": "Ping", "anonymous": false,
             "inputs": [{"name": "x", "type": "uint256", "indexed": false}]},
            {"type": "event", "name": "Ping", "anonymous": false,
             "inputs": [{"name": "x", "type": "uint256", "indexed": false}]}
        ]"#;
        // Two identical declarations collapse or collide depending on the
        // parser; either way the ABI must not register with both.
        match parse_abi(text) {
            Ok(abi) => assert_eq!(abi.events.len(), 1),
            Err(err) => assert!(matches!(err, RegistryError::InvalidAbi { .. })),
        }
    }
}
