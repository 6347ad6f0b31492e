//! `LogSource` trait — abstraction over the raw-log subscription.
//!
//! The network transport is an external collaborator; this trait is the
//! whole interface the listener consumes: a stream of raw logs with
//! in-stream errors as the termination signal.

use async_trait::async_trait;
use futures::Stream;
use logcast_core::{RawLog, StreamError};
use std::pin::Pin;

/// A stream of raw log records from a single subscription.
pub type RawLogStream = Pin<Box<dyn Stream<Item = Result<RawLog, StreamError>> + Send>>;

/// Abstracts over raw-log transports (WebSocket node subscription, replay
/// files, test stubs).
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Connect and start streaming raw logs.
    /// Returns a pinned async stream of `RawLog` items.
    async fn subscribe(&self) -> Result<RawLogStream, StreamError>;
}
