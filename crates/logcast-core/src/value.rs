//! Normalized decoded values.
//!
//! Every decoded log argument is represented as a `FieldValue` so consumers
//! never deal with raw ABI words or alloy-specific types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded, normalized argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Uint(u128),
    /// Large uints (> u128) stored as decimal string
    BigUint(String),
    Int(i128),
    /// Large ints (> i128) stored as decimal string
    BigInt(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Str(String),
    /// EVM address — 20 bytes, hex with 0x prefix
    Address(String),
    Array(Vec<FieldValue>),
    Tuple(Vec<(String, FieldValue)>),
    Null,
}

impl FieldValue {
    /// Returns `true` if this value is logically null/absent.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the inner string if this is an Address value.
    pub fn as_address(&self) -> Option<&str> {
        match self {
            FieldValue::Address(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce to a u128 if this is a small Uint.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Uint(v) => write!(f, "{v}"),
            FieldValue::BigUint(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::BigInt(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            FieldValue::Str(s) => write!(f, "{s}"),
            FieldValue::Address(a) => write!(f, "{a}"),
            FieldValue::Array(v) => {
                let parts: Vec<_> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            FieldValue::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            FieldValue::Null => write!(f, "null"),
        }
    }
}
