use std::sync::Mutex;

use tracing::info;

use crate::events::PublisherEvent;

/// Capability for emitting [`PublisherEvent`]s, injected at construction
/// rather than reached for as a process-wide singleton.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PublisherEvent);
}

/// Default sink: forwards every event to `tracing` as a structured event.
#[derive(Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: PublisherEvent) {
        match event {
            PublisherEvent::TransactionPublished {
                publish_id,
                channel_id,
                remote_node_id,
                tx,
                fee,
                tx_desc,
            } => {
                info!(
                    %publish_id,
                    channel_id = channel_id.as_deref().unwrap_or("-"),
                    remote_node_id = remote_node_id.as_deref().unwrap_or("-"),
                    txid = %tx.compute_txid(),
                    %fee,
                    desc = %tx_desc,
                    "transaction published"
                );
            }
            PublisherEvent::TransactionConfirmed {
                publish_id,
                channel_id,
                remote_node_id,
                tx,
            } => {
                info!(
                    %publish_id,
                    channel_id = channel_id.as_deref().unwrap_or("-"),
                    remote_node_id = remote_node_id.as_deref().unwrap_or("-"),
                    txid = %tx.compute_txid(),
                    "transaction confirmed"
                );
            }
        }
    }
}

/// Test sink: collects every emitted event for assertions.
#[derive(Debug, Default)]
pub struct VecEventSink {
    events: Mutex<Vec<PublisherEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<PublisherEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl EventSink for VecEventSink {
    fn emit(&self, event: PublisherEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{absolute::LockTime, transaction::Version, Transaction};
    use rtxp_primitives::PublishId;

    use super::*;

    fn dummy_tx() -> Transaction {
        Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![],
            output: vec![],
        }
    }

    #[test]
    fn vec_sink_collects_events() {
        let sink = VecEventSink::new();
        sink.emit(PublisherEvent::TransactionConfirmed {
            publish_id: PublishId::new(),
            channel_id: None,
            remote_node_id: None,
            tx: dummy_tx(),
        });

        let drained = sink.drain();
        assert_eq!(drained.len(), 1);
        assert!(sink.drain().is_empty());
    }
}
