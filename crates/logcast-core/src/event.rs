//! Raw and decoded log event types.

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The keccak-256 signature hash of `Transfer(address,address,uint256)`,
/// used to classify ERC-20 style transfer logs.
pub const ERC20_TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// A raw, undecoded log record as received from a node subscription.
/// This is the input to every decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract address that emitted the log (hex, 0x-prefixed)
    pub address: String,
    /// topics[0] is the event signature hash; additional topics are indexed params
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters
    pub data: Vec<u8>,
    /// Block number the log was included in
    pub block_number: u64,
    /// Transaction hash (hex, 0x-prefixed)
    pub tx_hash: String,
}

impl RawLog {
    /// Returns topics[0] if it looks like a well-formed 32-byte hex hash.
    pub fn signature_topic(&self) -> Option<&str> {
        let first = self.topics.first()?;
        let hex = first.strip_prefix("0x").unwrap_or(first);
        if hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(first.as_str())
        } else {
            None
        }
    }
}

/// Classification tag derived from a raw log's shape.
/// Used purely to pick a decoding strategy; not itself the decoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// No topics at all — a plain transaction-level log
    Transaction,
    /// topics[0] matches the ERC-20 `Transfer` signature
    TokenTransfer,
    /// Any other log with a well-formed signature topic
    Event,
    /// Malformed or unrecognizable signature topic
    Unknown,
}

impl LogKind {
    /// Classify a raw log. Pure function of the log's shape.
    pub fn classify(raw: &RawLog) -> LogKind {
        if raw.topics.is_empty() {
            return LogKind::Transaction;
        }
        match raw.signature_topic() {
            Some(sig) if sig.eq_ignore_ascii_case(ERC20_TRANSFER_TOPIC) => LogKind::TokenTransfer,
            Some(_) => LogKind::Event,
            None => LogKind::Unknown,
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Transaction => write!(f, "transaction"),
            LogKind::TokenTransfer => write!(f, "token_transfer"),
            LogKind::Event => write!(f, "event"),
            LogKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A decoded, classified log event — the primary output of Logcast.
///
/// Constructed once by a decoder from a single raw log and immutable
/// thereafter; every subscriber receives its own clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Emitting contract address (may be empty if unknown)
    pub contract: String,
    /// Resolved event name, e.g. "Transfer", or "UnknownEvent" when no ABI matched
    pub event: String,
    /// Transaction hash
    pub tx_hash: String,
    /// Block number
    pub block: u64,
    /// Wall-clock time of decode (Unix seconds), not chain time
    pub timestamp: i64,
    /// Classification tag the decoder was dispatched on
    pub kind: LogKind,
    /// Decoded argument values keyed by parameter name; empty when no ABI was available
    pub args: HashMap<String, FieldValue>,
}

impl LogEvent {
    /// Build the generic fallback event for a raw log: provenance fields
    /// copied verbatim, empty args.
    pub fn generic(raw: &RawLog, kind: LogKind, event: impl Into<String>) -> Self {
        Self {
            contract: raw.address.clone(),
            event: event.into(),
            tx_hash: raw.tx_hash.clone(),
            block: raw.block_number,
            timestamp: chrono::Utc::now().timestamp(),
            kind,
            args: HashMap::new(),
        }
    }

    /// Get a decoded argument by name.
    pub fn arg(&self, name: &str) -> Option<&FieldValue> {
        self.args.get(name)
    }
}
