//! # logcast-core
//!
//! Core types, traits, and primitives shared across all Logcast crates.
//! The broadcaster, contract registry, decoders, and the stream listener
//! are all built on top of the interfaces defined here.

pub mod abi;
pub mod contract;
pub mod decoder;
pub mod error;
pub mod event;
pub mod value;

pub use abi::{ContractAbi, EventDef, ParamDef};
pub use contract::{ContractLookup, ContractMeta};
pub use decoder::{DecoderRegistry, LogDecoder};
pub use error::{BusError, DecodeError, RegistryError, StreamError};
pub use event::{LogEvent, LogKind, RawLog};
pub use value::FieldValue;
