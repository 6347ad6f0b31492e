//! `WsLogSource` — concrete `LogSource` over an Ethereum JSON-RPC WebSocket
//! subscription (`eth_subscribe("logs", ...)`).

use crate::config::ListenerConfig;
use crate::source::{LogSource, RawLogStream};
use async_trait::async_trait;
use futures::{channel::mpsc, SinkExt, StreamExt};
use logcast_core::{RawLog, StreamError};
use serde_json::Value;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info};

/// WebSocket raw-log source.
///
/// Subscribes to `eth_subscribe("logs", filter)` and yields `RawLog` items.
/// A connection or protocol failure is surfaced as an in-stream error and
/// ends the stream; the source does not reconnect.
pub struct WsLogSource {
    ws_url: String,
    filter_addresses: Vec<String>,
    channel_capacity: usize,
}

impl WsLogSource {
    pub fn new(config: &ListenerConfig) -> Self {
        Self {
            ws_url: config.ws_url.clone(),
            filter_addresses: config.filter_addresses.clone(),
            channel_capacity: config.channel_capacity,
        }
    }
}

#[async_trait]
impl LogSource for WsLogSource {
    async fn subscribe(&self) -> Result<RawLogStream, StreamError> {
        let (tx, rx) = mpsc::channel::<Result<RawLog, StreamError>>(self.channel_capacity);

        let ws_url = self.ws_url.clone();
        let filter_addresses = self.filter_addresses.clone();

        tokio::spawn(async move {
            run_ws_subscription(ws_url, filter_addresses, tx).await;
        });

        Ok(Box::pin(rx))
    }
}

// ─── Internal WebSocket loop ──────────────────────────────────────────────────

async fn run_ws_subscription(
    ws_url: String,
    filter_addresses: Vec<String>,
    mut tx: mpsc::Sender<Result<RawLog, StreamError>>,
) {
    info!("connecting to WebSocket: {}", ws_url);

    let ws_stream = match connect_async(&ws_url).await {
        Ok((ws, _)) => {
            info!("WebSocket connected: {}", ws_url);
            ws
        }
        Err(e) => {
            error!("WebSocket connect failed: {}", e);
            let _ = tx
                .send(Err(StreamError::ConnectionFailed {
                    url: ws_url.clone(),
                    reason: e.to_string(),
                }))
                .await;
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    let filter = build_log_filter(&filter_addresses);
    let sub_msg = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_subscribe",
        "params": ["logs", filter]
    });

    if let Err(e) = write.send(Message::Text(sub_msg.to_string())).await {
        error!("failed to send eth_subscribe: {}", e);
        let _ = tx.send(Err(StreamError::Closed)).await;
        return;
    }

    while let Some(msg_result) = read.next().await {
        match msg_result {
            Err(e) => {
                error!("WebSocket error: {}", e);
                let _ = tx.send(Err(StreamError::Closed)).await;
                break;
            }
            Ok(Message::Text(text)) => {
                debug!("WS message: {}", &text[..text.len().min(120)]);
                if let Some(raw) = parse_subscription_log(&text) {
                    if tx.send(Ok(raw)).await.is_err() {
                        // Receiver dropped — the listener has gone away
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed by server");
                let _ = tx.send(Err(StreamError::Closed)).await;
                break;
            }
            Ok(Message::Ping(data)) => {
                // Respond to server pings to keep the connection alive
                let _ = write.send(Message::Pong(data)).await;
            }
            Ok(_) => {} // binary / pong — ignore
        }
    }

    info!("WebSocket subscription loop ended");
}

// ─── Message parsing ─────────────────────────────────────────────────────────

/// Parse an `eth_subscription` log notification into a `RawLog`.
/// Returns `None` for subscription confirmations, reorged (removed) logs,
/// or unparseable messages. Topic-less logs are kept — they classify as
/// transaction-level logs downstream.
fn parse_subscription_log(text: &str) -> Option<RawLog> {
    let v: Value = serde_json::from_str(text).ok()?;

    if v.get("method")?.as_str()? != "eth_subscription" {
        return None;
    }

    let result = v.get("params")?.get("result")?;

    if result
        .get("removed")
        .and_then(|r| r.as_bool())
        .unwrap_or(false)
    {
        return None;
    }

    let address = result.get("address")?.as_str()?.to_string();

    let topics: Vec<String> = result
        .get("topics")
        .and_then(|t| t.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|t| t.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    let data_hex = result.get("data").and_then(|d| d.as_str()).unwrap_or("0x");
    let data = hex::decode(data_hex.strip_prefix("0x").unwrap_or(data_hex)).unwrap_or_default();

    let block_number = hex_str_to_u64(result.get("blockNumber").and_then(|b| b.as_str()));
    let tx_hash = result
        .get("transactionHash")
        .and_then(|t| t.as_str())
        .unwrap_or("0x0")
        .to_string();

    Some(RawLog {
        address,
        topics,
        data,
        block_number,
        tx_hash,
    })
}

fn build_log_filter(addresses: &[String]) -> Value {
    if addresses.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::json!({ "address": addresses })
    }
}

fn hex_str_to_u64(s: Option<&str>) -> u64 {
    s.and_then(|h| u64::from_str_radix(h.strip_prefix("0x").unwrap_or(h), 16).ok())
        .unwrap_or(0)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
