//! End-to-end pipeline tests: stub raw-log source → decoder table →
//! broadcaster → subscriber channels.

use async_trait::async_trait;
use logcast_bus::LogBroadcaster;
use logcast_core::abi::keccak256_signature;
use logcast_core::{ContractMeta, FieldValue, LogKind, RawLog, StreamError};
use logcast_evm::default_decoders;
use logcast_observability::{init_tracing, LogConfig};
use logcast_registry::ContractRegistry;
use logcast_stream::{LogListener, LogSource, RawLogStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const COUNTER: &str = "0xabc0000000000000000000000000000000000001";
const WHO: &str = "0x0000000000000000000000000000000000beef01";

const COUNTER_ABI: &str = r#"[
    {
        "type": "event",
        "name": "Incremented",
        "anonymous": false,
        "inputs": [
            {"name": "who", "type": "address", "indexed": true},
            {"name": "newValue", "type": "uint256", "indexed": false}
        ]
    }
]"#;

/// Yields a fixed list of items, then ends the stream.
struct StubSource(Mutex<Option<Vec<Result<RawLog, StreamError>>>>);

impl StubSource {
    fn new(items: Vec<Result<RawLog, StreamError>>) -> Self {
        Self(Mutex::new(Some(items)))
    }
}

#[async_trait]
impl LogSource for StubSource {
    async fn subscribe(&self) -> Result<RawLogStream, StreamError> {
        let items = self.0.lock().unwrap().take().unwrap_or_default();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Never yields anything; used to exercise cancellation.
struct PendingSource;

#[async_trait]
impl LogSource for PendingSource {
    async fn subscribe(&self) -> Result<RawLogStream, StreamError> {
        Ok(Box::pin(futures::stream::pending()))
    }
}

/// Fails at subscription time.
struct FailingSource;

#[async_trait]
impl LogSource for FailingSource {
    async fn subscribe(&self) -> Result<RawLogStream, StreamError> {
        Err(StreamError::ConnectionFailed {
            url: "ws://localhost:8546".into(),
            reason: "connection refused".into(),
        })
    }
}

fn counter_registry() -> ContractRegistry {
    let registry = ContractRegistry::new();
    registry
        .add(ContractMeta {
            alias: "CounterV1".into(),
            address: COUNTER.into(),
            abi_json: COUNTER_ABI.into(),
            ..Default::default()
        })
        .expect("registration failed");
    registry
}

fn incremented_raw(new_value: u64) -> RawLog {
    let who_hex = WHO.strip_prefix("0x").unwrap();
    let mut data = vec![0u8; 32];
    data[24..].copy_from_slice(&new_value.to_be_bytes());
    RawLog {
        address: COUNTER.into(),
        topics: vec![
            keccak256_signature("Incremented(address,uint256)"),
            format!("0x{}{who_hex}", "0".repeat(64 - who_hex.len())),
        ],
        data,
        block_number: 100,
        tx_hash: "0x123".into(),
    }
}

fn build_listener(source: Arc<dyn LogSource>, registry: &ContractRegistry) -> LogListener {
    let decoders = Arc::new(default_decoders(Arc::new(registry.clone())));
    let broadcaster = Arc::new(LogBroadcaster::new());
    LogListener::new(source, decoders, broadcaster)
}

#[tokio::test]
async fn counter_event_reaches_every_subscriber() {
    init_tracing(&LogConfig::default());

    let registry = counter_registry();
    let source = Arc::new(StubSource::new(vec![Ok(incremented_raw(42))]));
    let decoders = Arc::new(default_decoders(Arc::new(registry.clone())));
    let broadcaster = Arc::new(LogBroadcaster::new());

    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, mut rx_b) = mpsc::channel(8);
    broadcaster.subscribe(tx_a).unwrap();
    broadcaster.subscribe(tx_b).unwrap();

    let listener = LogListener::new(source, decoders, broadcaster);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    listener.run(shutdown_rx).await.unwrap();

    for rx in [&mut rx_a, &mut rx_b] {
        let event = rx.recv().await.expect("subscriber missed the event");
        assert_eq!(event.contract, COUNTER);
        assert_eq!(event.event, "Incremented");
        assert_eq!(event.kind, LogKind::Event);
        assert_eq!(event.block, 100);
        assert_eq!(event.arg("who").and_then(FieldValue::as_address), Some(WHO));
        assert_eq!(event.arg("newValue").and_then(FieldValue::as_u128), Some(42));
    }

    let metrics = listener.metrics();
    assert_eq!(metrics.logs_received, 1);
    assert_eq!(metrics.events_published, 1);
    assert_eq!(metrics.decode_errors, 0);
}

#[tokio::test]
async fn unregistered_contract_flows_through_as_generic() {
    init_tracing(&LogConfig::default());

    let registry = ContractRegistry::new();
    let source = Arc::new(StubSource::new(vec![Ok(incremented_raw(7))]));
    let decoders = Arc::new(default_decoders(Arc::new(registry)));
    let broadcaster = Arc::new(LogBroadcaster::new());

    let (tx, mut rx) = mpsc::channel(8);
    broadcaster.subscribe(tx).unwrap();

    let listener = LogListener::new(source, decoders, broadcaster);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    listener.run(shutdown_rx).await.unwrap();

    let event = rx.recv().await.expect("subscriber missed the event");
    assert_eq!(event.event, "UnknownEvent");
    assert_eq!(event.contract, COUNTER);
    assert_eq!(event.tx_hash, "0x123");
    assert!(event.args.is_empty());

    assert_eq!(listener.metrics().generic_fallbacks, 1);
}

#[tokio::test]
async fn cancellation_exits_promptly() {
    init_tracing(&LogConfig::default());

    let registry = ContractRegistry::new();
    let listener = Arc::new(build_listener(Arc::new(PendingSource), &registry));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = {
        let listener = Arc::clone(&listener);
        tokio::spawn(async move { listener.run(shutdown_rx).await })
    };

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("listener did not observe cancellation")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn stream_error_terminates_loop_only() {
    init_tracing(&LogConfig::default());

    let registry = counter_registry();
    let source = Arc::new(StubSource::new(vec![
        Ok(incremented_raw(1)),
        Err(StreamError::Closed),
        // Never reached: the loop exits on the error.
        Ok(incremented_raw(2)),
    ]));
    let decoders = Arc::new(default_decoders(Arc::new(registry.clone())));
    let broadcaster = Arc::new(LogBroadcaster::new());

    let (tx, mut rx) = mpsc::channel(8);
    broadcaster.subscribe(tx).unwrap();

    let listener = LogListener::new(source, Arc::clone(&decoders), Arc::clone(&broadcaster));
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    listener.run(shutdown_rx).await.unwrap();

    assert_eq!(rx.recv().await.unwrap().arg("newValue").and_then(FieldValue::as_u128), Some(1));
    assert!(rx.try_recv().is_err());
    assert_eq!(listener.metrics().stream_errors, 1);
    assert_eq!(listener.metrics().logs_received, 1);

    // The broadcaster and registry survive the dead listener.
    let (tx2, mut rx2) = mpsc::channel(1);
    broadcaster.subscribe(tx2).unwrap();
    let event = decoders.decode(&incremented_raw(3)).unwrap();
    broadcaster.publish(event);
    assert_eq!(rx2.recv().await.unwrap().arg("newValue").and_then(FieldValue::as_u128), Some(3));
    assert!(registry.get(COUNTER).is_some());
}

#[tokio::test]
async fn subscription_failure_surfaces_to_caller() {
    init_tracing(&LogConfig::default());

    let registry = ContractRegistry::new();
    let listener = build_listener(Arc::new(FailingSource), &registry);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let err = listener.run(shutdown_rx).await.unwrap_err();
    assert!(matches!(err, StreamError::ConnectionFailed { .. }));
}

#[tokio::test]
async fn late_registration_upgrades_subsequent_decodes() {
    init_tracing(&LogConfig::default());

    // A decode racing a late registration legitimately falls back; once the
    // registration lands, the same decoder table resolves the event.
    let registry = ContractRegistry::new();
    let decoders = Arc::new(default_decoders(Arc::new(registry.clone())));

    let before = decoders.decode(&incremented_raw(5)).unwrap();
    assert_eq!(before.event, "UnknownEvent");

    registry
        .add(ContractMeta {
            alias: "CounterV1".into(),
            address: COUNTER.into(),
            abi_json: COUNTER_ABI.into(),
            ..Default::default()
        })
        .unwrap();

    let after = decoders.decode(&incremented_raw(5)).unwrap();
    assert_eq!(after.event, "Incremented");
    assert_eq!(after.arg("newValue").and_then(FieldValue::as_u128), Some(5));
}
