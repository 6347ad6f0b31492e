//! The `LogDecoder` trait and the tag-to-strategy dispatch registry.
//!
//! Decoders are object-safe so they can be stored as `Arc<dyn LogDecoder>`
//! and shared across Tokio tasks. The `DecoderRegistry` is built explicitly
//! during process initialisation and passed by reference into the listener —
//! there is no ambient global registration.

use crate::error::DecodeError;
use crate::event::{LogEvent, LogKind, RawLog};
use std::collections::HashMap;
use std::sync::Arc;

/// A decoding strategy for one class of raw log.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so they can be shared across
/// Tokio tasks without additional locking.
pub trait LogDecoder: Send + Sync {
    /// Decode a single raw log into a `LogEvent`.
    fn decode(&self, raw: &RawLog) -> Result<LogEvent, DecodeError>;
}

/// Maps a `LogKind` to a decoding strategy, with one designated default
/// used when no strategy is registered for a tag.
pub struct DecoderRegistry {
    decoders: HashMap<LogKind, Arc<dyn LogDecoder>>,
    default: Arc<dyn LogDecoder>,
}

impl DecoderRegistry {
    pub fn new(default: Arc<dyn LogDecoder>) -> Self {
        Self {
            decoders: HashMap::new(),
            default,
        }
    }

    /// Register a strategy for a tag, replacing any previous registration.
    pub fn register(&mut self, kind: LogKind, decoder: Arc<dyn LogDecoder>) {
        self.decoders.insert(kind, decoder);
    }

    /// Strategy for a tag, falling back to the default.
    pub fn decoder_for(&self, kind: LogKind) -> &Arc<dyn LogDecoder> {
        self.decoders.get(&kind).unwrap_or(&self.default)
    }

    /// Classify the raw log and run the dispatched strategy.
    pub fn decode(&self, raw: &RawLog) -> Result<LogEvent, DecodeError> {
        let kind = LogKind::classify(raw);
        self.decoder_for(kind).decode(raw)
    }
}
