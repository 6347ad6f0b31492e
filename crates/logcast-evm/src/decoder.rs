//! Decoding strategies: the ABI-driven decoder plus the generic fallbacks.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use logcast_core::{
    abi::ParamDef,
    contract::ContractLookup,
    decoder::{DecoderRegistry, LogDecoder},
    error::DecodeError,
    event::{LogEvent, LogKind, RawLog},
    value::FieldValue,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Fallback strategy: provenance fields copied verbatim, empty args.
#[derive(Debug, Default, Clone)]
pub struct GenericLogDecoder;

impl LogDecoder for GenericLogDecoder {
    fn decode(&self, raw: &RawLog) -> Result<LogEvent, DecodeError> {
        Ok(LogEvent::generic(raw, LogKind::classify(raw), "UnknownEvent"))
    }
}

/// Strategy for topic-less transaction-level logs.
#[derive(Debug, Default, Clone)]
pub struct TransactionLogDecoder;

impl LogDecoder for TransactionLogDecoder {
    fn decode(&self, raw: &RawLog) -> Result<LogEvent, DecodeError> {
        Ok(LogEvent::generic(raw, LogKind::Transaction, "TransactionLog"))
    }
}

/// The full ABI pipeline: resolve the emitting address in the contract
/// directory, match topics[0] against the registered event selectors, then
/// decode indexed parameters from topics and non-indexed parameters from
/// the data payload.
///
/// Every anomaly short of a matched-event decode is handled by falling back
/// to the generic event or by emitting partial args with a warning; this
/// decoder never fails a single log hard.
pub struct AbiLogDecoder {
    contracts: Arc<dyn ContractLookup>,
}

impl AbiLogDecoder {
    pub fn new(contracts: Arc<dyn ContractLookup>) -> Self {
        Self { contracts }
    }

    fn parse_ty(ty: &str) -> Result<DynSolType, DecodeError> {
        ty.parse::<DynSolType>().map_err(|e| DecodeError::TypeParse {
            ty: ty.to_string(),
            reason: e.to_string(),
        })
    }

    /// Decode a single indexed topic (always 32 bytes, ABI-encoded).
    ///
    /// # EVM ABI indexed-parameter encoding rules
    /// - **Value types** (uint, int, bool, address, bytes1–bytes32): padded
    ///   to 32 bytes, stored directly — we can ABI-decode and recover the
    ///   value.
    /// - **Reference types** (string, bytes, arrays, tuples): stored as the
    ///   keccak-256 of their encoded form — the original value is
    ///   unrecoverable. We return the raw 32-byte hash as `Bytes`.
    fn decode_topic(&self, topic_hex: &str, ty: &str) -> Result<FieldValue, DecodeError> {
        let raw = topic_hex.strip_prefix("0x").unwrap_or(topic_hex);
        let bytes = hex::decode(raw).map_err(|e| DecodeError::InvalidRawLog {
            reason: format!("invalid topic hex: {e}"),
        })?;

        let dyn_type = Self::parse_ty(ty)?;
        match dyn_type {
            DynSolType::String
            | DynSolType::Bytes
            | DynSolType::Array(_)
            | DynSolType::FixedArray(..)
            | DynSolType::Tuple(_) => return Ok(FieldValue::Bytes(bytes)),
            _ => {}
        }

        match dyn_type.abi_decode(&bytes) {
            Ok(val) => Ok(crate::normalizer::normalize(val)),
            Err(e) => Err(DecodeError::AbiDecodeFailed {
                reason: format!("topic decode: {e}"),
            }),
        }
    }

    /// Decode the log data (non-indexed params) as an ABI-encoded tuple.
    fn decode_data(
        &self,
        raw_data: &[u8],
        data_inputs: &[&ParamDef],
    ) -> Result<HashMap<String, FieldValue>, DecodeError> {
        if data_inputs.is_empty() {
            return Ok(HashMap::new());
        }

        let types: Result<Vec<DynSolType>, DecodeError> = data_inputs
            .iter()
            .map(|p| Self::parse_ty(&p.ty))
            .collect();
        let tuple_type = DynSolType::Tuple(types?);

        let decoded = tuple_type
            .abi_decode(raw_data)
            .map_err(|e| DecodeError::AbiDecodeFailed {
                reason: e.to_string(),
            })?;

        let values = match decoded {
            DynSolValue::Tuple(vals) => vals,
            other => vec![other],
        };

        if values.len() != data_inputs.len() {
            warn!(
                expected = data_inputs.len(),
                decoded = values.len(),
                "data payload value count does not match ABI, decoding best-effort"
            );
        }

        let mut out = HashMap::new();
        for (param, val) in data_inputs.iter().zip(values.into_iter()) {
            out.insert(param.name.clone(), crate::normalizer::normalize(val));
        }
        Ok(out)
    }
}

impl LogDecoder for AbiLogDecoder {
    fn decode(&self, raw: &RawLog) -> Result<LogEvent, DecodeError> {
        let kind = LogKind::classify(raw);

        // Address unknown → generic fallback, not an error. A decode racing
        // a late registration for the same address lands here legitimately.
        let meta = match self.contracts.lookup(&raw.address) {
            Some(m) => m,
            None => return Ok(LogEvent::generic(raw, kind, "UnknownEvent")),
        };
        let topic0 = match raw.signature_topic() {
            Some(t) => t,
            None => return Ok(LogEvent::generic(raw, kind, "UnknownEvent")),
        };
        let event_def = match meta.abi.event_for_topic(topic0) {
            Some(e) => e,
            None => return Ok(LogEvent::generic(raw, kind, "UnknownEvent")),
        };

        let mut args = HashMap::new();

        let indexed = event_def.indexed_inputs();
        if indexed.len() != raw.topics.len() - 1 {
            warn!(
                event = %event_def.name,
                expected = indexed.len(),
                got = raw.topics.len() - 1,
                "indexed parameter count does not match topics, decoding best-effort"
            );
        }
        for (i, param) in indexed.iter().enumerate() {
            // topics[0] is the signature
            let topic = match raw.topics.get(i + 1) {
                Some(t) => t,
                None => break,
            };
            match self.decode_topic(topic, &param.ty) {
                Ok(value) => {
                    args.insert(param.name.clone(), value);
                }
                Err(e) => {
                    warn!(event = %event_def.name, param = %param.name, error = %e,
                        "failed to decode indexed parameter");
                }
            }
        }

        match self.decode_data(&raw.data, &event_def.data_inputs()) {
            Ok(decoded) => args.extend(decoded),
            Err(e) => {
                warn!(event = %event_def.name, error = %e,
                    "failed to decode data payload, emitting partial args");
            }
        }

        let mut event = LogEvent::generic(raw, kind, event_def.name.clone());
        event.args = args;
        Ok(event)
    }
}

/// Wire up the standard dispatch table: ABI decoding for event-shaped logs,
/// the transaction strategy for topic-less logs, and the generic decoder as
/// the default for everything else.
///
/// Built once at process initialisation and handed to the listener; there
/// is no ambient global registry.
pub fn default_decoders(contracts: Arc<dyn ContractLookup>) -> DecoderRegistry {
    let abi = Arc::new(AbiLogDecoder::new(contracts));
    let mut registry = DecoderRegistry::new(Arc::new(GenericLogDecoder));
    registry.register(LogKind::Event, abi.clone());
    registry.register(LogKind::TokenTransfer, abi);
    registry.register(LogKind::Transaction, Arc::new(TransactionLogDecoder));
    registry
}
