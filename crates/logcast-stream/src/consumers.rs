//! Example consumer: drains its own channel and logs each decoded event.

use logcast_core::{ContractLookup, LogEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Logs every received event, annotated with registry metadata when the
/// emitting contract is known. Owns its receiving channel and processes at
/// its own pace; a slow console never stalls the publisher.
pub struct ConsoleConsumer {
    name: String,
    contracts: Arc<dyn ContractLookup>,
    events: mpsc::Receiver<LogEvent>,
}

impl ConsoleConsumer {
    pub fn new(
        name: impl Into<String>,
        contracts: Arc<dyn ContractLookup>,
        events: mpsc::Receiver<LogEvent>,
    ) -> Self {
        Self {
            name: name.into(),
            contracts,
            events,
        }
    }

    /// Drain the channel until every sender is gone.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            info!(
                consumer = %self.name,
                kind = %event.kind,
                event = %event.event,
                contract = %event.contract,
                tx_hash = %event.tx_hash,
                args = ?event.args,
                "received event"
            );
            match self.contracts.lookup(&event.contract) {
                Some(meta) => {
                    debug!(consumer = %self.name, alias = %meta.alias, "contract is registered");
                }
                None => {
                    debug!(consumer = %self.name, contract = %event.contract,
                        "no metadata for this contract");
                }
            }
        }
    }
}
