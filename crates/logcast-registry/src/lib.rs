//! # logcast-registry
//!
//! Directory of deployed-contract metadata, addressable by contract address
//! and safe for concurrent registration and lookup from the decode path.
//!
//! Registrations arrive asynchronously (typically from an HTTP layer) and
//! may race in-flight decodes; a decode that runs before a late registration
//! legitimately falls back to the generic decode.
//!
//! The public-facing lookup API is the `ContractLookup` trait from
//! `logcast-core`.

pub mod abi_json;
pub mod memory;

pub use abi_json::parse_abi;
pub use memory::ContractRegistry;
