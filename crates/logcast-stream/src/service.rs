//! `LogListener` — the decode-and-publish loop.

use crate::source::LogSource;
use futures::StreamExt;
use logcast_bus::LogBroadcaster;
use logcast_core::{DecoderRegistry, RawLog, StreamError};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Counters snapshot for the listener loop.
#[derive(Debug, Clone, Default)]
pub struct ListenerMetrics {
    pub logs_received: u64,
    pub events_published: u64,
    pub decode_errors: u64,
    pub generic_fallbacks: u64,
    pub stream_errors: u64,
}

/// Single logical consumer of the raw-log stream: decodes every received
/// log and publishes the result to the broadcaster.
///
/// The loop services a three-way wait — next raw log, in-stream error,
/// cancellation — and exits on the latter two. A stream error is fatal to
/// this loop only; the broadcaster and registry remain usable. There is no
/// auto-reconnect: if the caller wants a new subscription it builds a new
/// listener.
pub struct LogListener {
    source: Arc<dyn LogSource>,
    decoders: Arc<DecoderRegistry>,
    broadcaster: Arc<LogBroadcaster>,
    metrics: Arc<Mutex<ListenerMetrics>>,
}

impl LogListener {
    pub fn new(
        source: Arc<dyn LogSource>,
        decoders: Arc<DecoderRegistry>,
        broadcaster: Arc<LogBroadcaster>,
    ) -> Self {
        Self {
            source,
            decoders,
            broadcaster,
            metrics: Arc::new(Mutex::new(ListenerMetrics::default())),
        }
    }

    /// Returns a snapshot of current counters.
    pub fn metrics(&self) -> ListenerMetrics {
        self.metrics.lock().unwrap().clone()
    }

    /// Subscribe to the source and run the decode loop until the stream
    /// ends, errors, or `shutdown` fires.
    ///
    /// A subscription failure at startup is returned to the caller. Once
    /// cancellation is observed no further event is published; dropping the
    /// stream releases the underlying subscription.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), StreamError> {
        let mut stream = self.source.subscribe().await?;
        info!("log listener started, listening for logs");

        loop {
            tokio::select! {
                // Check cancellation first so nothing is published after it
                // has been observed.
                biased;

                _ = shutdown.changed() => {
                    info!("log listener shutting down");
                    break;
                }
                item = stream.next() => match item {
                    None => {
                        info!("raw log stream ended");
                        break;
                    }
                    Some(Err(e)) => {
                        error!("subscription error: {e}");
                        self.metrics.lock().unwrap().stream_errors += 1;
                        break;
                    }
                    Some(Ok(raw)) => self.handle_raw(raw),
                },
            }
        }
        Ok(())
    }

    fn handle_raw(&self, raw: RawLog) {
        let mut metrics = self.metrics.lock().unwrap();
        metrics.logs_received += 1;

        match self.decoders.decode(&raw) {
            Ok(event) => {
                if event.args.is_empty() && event.event == "UnknownEvent" {
                    metrics.generic_fallbacks += 1;
                }
                metrics.events_published += 1;
                drop(metrics);
                self.broadcaster.publish(event);
            }
            Err(e) => {
                warn!("failed to decode log: {e}");
                metrics.decode_errors += 1;
            }
        }
    }
}
