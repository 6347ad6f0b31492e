//! Error types for the Logcast pipeline.

use thiserror::Error;

/// Errors that can occur while decoding a single raw log.
///
/// Decode-time anomalies (unknown address, topic-count mismatches) are
/// handled inside the decoders by best-effort fallback and never surface
/// here; these variants cover genuinely malformed input.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid raw log: {reason}")]
    InvalidRawLog { reason: String },

    #[error("ABI decode failed: {reason}")]
    AbiDecodeFailed { reason: String },

    #[error("Cannot parse type '{ty}': {reason}")]
    TypeParse { ty: String, reason: String },
}

/// Errors from the contract registry. All are rejected synchronously to
/// the caller at registration time; nothing is partially stored.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Contract already registered at address {address}")]
    DuplicateAddress { address: String },

    #[error("Alias '{alias}' already registered")]
    DuplicateAlias { alias: String },

    #[error("Invalid ABI: {reason}")]
    InvalidAbi { reason: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

/// Errors from the broadcaster. Subscription-contract violations are caller
/// bugs and surface immediately.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("Channel already subscribed")]
    AlreadySubscribed,
}

/// Errors from the raw-log stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Connection failed: {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Stream closed unexpectedly")]
    Closed,

    #[error("{0}")]
    Other(String),
}
