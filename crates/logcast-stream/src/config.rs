//! Listener configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the log listener and its WebSocket subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// WebSocket RPC endpoint, e.g. "ws://localhost:8546"
    pub ws_url: String,
    /// Contract addresses to filter on (empty = all contracts)
    #[serde(default)]
    pub filter_addresses: Vec<String>,
    /// Buffer size of the internal subscription channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    512
}

impl ListenerConfig {
    /// Config subscribed to every contract on the node.
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            filter_addresses: vec![],
            channel_capacity: default_channel_capacity(),
        }
    }
}
