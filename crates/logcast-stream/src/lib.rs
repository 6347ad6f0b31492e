//! # logcast-stream
//!
//! Drives the Logcast pipeline: receives raw log records from a node
//! subscription, decodes each one, and publishes the result to the
//! broadcaster.
//!
//! ## Architecture
//! ```text
//! LogSource (WebSocket subscription, Tokio task)
//!       │
//!       ▼
//! RawLog stream
//!       │
//!       ▼
//! DecoderRegistry (classify → strategy → ContractLookup → decode)
//!       │
//!       ▼
//! LogBroadcaster::publish   ← consumers drain their own channels
//! ```
//!
//! The listener exits its loop on stream error or cancellation; it never
//! reconnects on its own — reconnection, if wanted, belongs to the caller.

pub mod config;
pub mod consumers;
pub mod service;
pub mod source;
pub mod ws_source;

pub use config::ListenerConfig;
pub use consumers::ConsoleConsumer;
pub use service::{ListenerMetrics, LogListener};
pub use source::{LogSource, RawLogStream};
pub use ws_source::WsLogSource;
