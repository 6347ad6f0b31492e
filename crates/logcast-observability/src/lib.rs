//! # logcast-observability
//!
//! Tracing and structured-logging initialisation for Logcast binaries and
//! tests. The library crates only emit `tracing` events; installing a
//! subscriber is the embedding application's call.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
