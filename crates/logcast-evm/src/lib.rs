//! # logcast-evm
//!
//! ABI-driven decoding strategies implementing the `LogDecoder` trait.
//!
//! ## Implementation notes
//! - Uses `alloy-core` for ABI decode
//! - Topics[0] → event signature hash, matched against registered ABIs
//! - Topics[1..] → indexed parameters (each 32 bytes, ABI-encoded)
//! - `data` → non-indexed parameters (ABI-encoded tuple)
//! - Anomalies (unknown address, count mismatches) fall back best-effort;
//!   one malformed log never aborts the pipeline

pub mod decoder;
pub mod normalizer;

pub use decoder::{default_decoders, AbiLogDecoder, GenericLogDecoder, TransactionLogDecoder};
