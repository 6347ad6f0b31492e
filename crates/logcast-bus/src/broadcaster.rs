//! `LogBroadcaster` — fan-out of decoded events to subscriber channels.

use logcast_core::{BusError, LogEvent};
use std::sync::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

/// Delivers each published `LogEvent` to every currently-subscribed sink.
///
/// Sinks are bounded `mpsc` senders owned by their consumers; the
/// broadcaster holds a non-owning reference for delivery only. A sink whose
/// buffer is full misses that event — no error, no retry, no backlog.
///
/// The subscriber set is guarded by a mutex held only for the duration of
/// set mutation or the non-blocking `try_send` loop, so `subscribe`,
/// `unsubscribe`, and `publish` are safe from arbitrary concurrent callers.
pub struct LogBroadcaster {
    subscribers: Mutex<Vec<mpsc::Sender<LogEvent>>>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a sink. The sink becomes eligible for all subsequent
    /// `publish` calls.
    ///
    /// Subscribing the exact same channel twice is a caller bug (it would
    /// cause duplicate delivery) and returns `BusError::AlreadySubscribed`.
    pub fn subscribe(&self, tx: mpsc::Sender<LogEvent>) -> Result<(), BusError> {
        let mut subs = self.subscribers.lock().unwrap();
        if subs.iter().any(|s| s.same_channel(&tx)) {
            return Err(BusError::AlreadySubscribed);
        }
        subs.push(tx);
        Ok(())
    }

    /// Remove a previously registered sink. Returns `false` (no-op) if the
    /// sink was not registered. Safe to call concurrently with `publish`.
    pub fn unsubscribe(&self, tx: &mpsc::Sender<LogEvent>) -> bool {
        let mut subs = self.subscribers.lock().unwrap();
        match subs.iter().position(|s| s.same_channel(tx)) {
            Some(idx) => {
                subs.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Deliver a copy of `event` to every registered sink without blocking.
    ///
    /// A sink with a full buffer drops the event for that sink only; a sink
    /// whose receiver has been dropped is treated the same way. Dropped
    /// events are not reported anywhere.
    pub fn publish(&self, event: LogEvent) {
        let subs = self.subscribers.lock().unwrap();
        for tx in subs.iter() {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug!(event = %event.event, "subscriber buffer full, dropping event");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(event = %event.event, "subscriber channel closed, dropping event");
                }
            }
        }
    }

    /// Number of currently registered sinks.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logcast_core::{LogKind, RawLog};

    fn sample_event(tx_hash: &str) -> LogEvent {
        let raw = RawLog {
            address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".into(),
            topics: vec![],
            data: vec![],
            block_number: 7,
            tx_hash: tx_hash.into(),
        };
        LogEvent::generic(&raw, LogKind::Transaction, "TestEvent")
    }

    #[tokio::test]
    async fn subscribe_and_publish() {
        let bus = LogBroadcaster::new();
        let (tx, mut rx) = mpsc::channel(1);
        bus.subscribe(tx).unwrap();

        bus.publish(sample_event("0x123"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.tx_hash, "0x123");
    }

    #[tokio::test]
    async fn fan_out_reaches_every_subscriber() {
        let bus = LogBroadcaster::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        bus.subscribe(tx_a).unwrap();
        bus.subscribe(tx_b).unwrap();

        bus.publish(sample_event("0x1"));
        bus.publish(sample_event("0x2"));

        // Per-subscriber FIFO: each sink sees both events in publish order.
        assert_eq!(rx_a.recv().await.unwrap().tx_hash, "0x1");
        assert_eq!(rx_a.recv().await.unwrap().tx_hash, "0x2");
        assert_eq!(rx_b.recv().await.unwrap().tx_hash, "0x1");
        assert_eq!(rx_b.recv().await.unwrap().tx_hash, "0x2");
    }

    #[tokio::test]
    async fn duplicate_subscribe_rejected() {
        let bus = LogBroadcaster::new();
        let (tx, _rx) = mpsc::channel(1);
        bus.subscribe(tx.clone()).unwrap();

        assert_eq!(bus.subscribe(tx), Err(BusError::AlreadySubscribed));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn full_subscriber_drops_without_blocking_others() {
        let bus = LogBroadcaster::new();
        let (tx_slow, mut rx_slow) = mpsc::channel(1);
        let (tx_fast, mut rx_fast) = mpsc::channel(4);
        bus.subscribe(tx_slow).unwrap();
        bus.subscribe(tx_fast).unwrap();

        // Second publish overflows the slow sink's single-slot buffer.
        bus.publish(sample_event("0x1"));
        bus.publish(sample_event("0x2"));

        assert_eq!(rx_fast.recv().await.unwrap().tx_hash, "0x1");
        assert_eq!(rx_fast.recv().await.unwrap().tx_hash, "0x2");

        // The slow sink got the first event and silently missed the second.
        assert_eq!(rx_slow.recv().await.unwrap().tx_hash, "0x1");
        assert!(rx_slow.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let bus = LogBroadcaster::new();
        let (tx, mut rx) = mpsc::channel(4);
        bus.subscribe(tx.clone()).unwrap();

        assert!(bus.unsubscribe(&tx));
        bus.publish(sample_event("0x1"));

        assert!(rx.try_recv().is_err());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_unknown_is_noop() {
        let bus = LogBroadcaster::new();
        let (tx, _rx) = mpsc::channel::<LogEvent>(1);
        assert!(!bus.unsubscribe(&tx));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers() {
        let bus = LogBroadcaster::new();
        bus.publish(sample_event("0x1"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn closed_receiver_does_not_poison_publish() {
        let bus = LogBroadcaster::new();
        let (tx_dead, rx_dead) = mpsc::channel(1);
        let (tx_live, mut rx_live) = mpsc::channel(1);
        bus.subscribe(tx_dead).unwrap();
        bus.subscribe(tx_live).unwrap();
        drop(rx_dead);

        bus.publish(sample_event("0x1"));
        assert_eq!(rx_live.recv().await.unwrap().tx_hash, "0x1");
    }
}
