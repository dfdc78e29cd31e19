use bitcoin::Transaction;
use rtxp_primitives::PublishId;

/// Structured records emitted by a replaceable-transaction publisher's
/// mempool-tracking entity for external reconciliation. Each variant is
/// emitted at most once per publisher attempt.
#[derive(Debug, Clone)]
pub enum PublisherEvent {
    /// A transaction was accepted by the blockchain client on first publish.
    TransactionPublished {
        publish_id: PublishId,
        channel_id: Option<String>,
        remote_node_id: Option<String>,
        tx: Transaction,
        /// Absolute fee in satoshis, per `FundedTx::fee`, not the feerate.
        fee: u64,
        tx_desc: String,
    },
    /// A transaction reached the configured confirmation depth.
    TransactionConfirmed {
        publish_id: PublishId,
        channel_id: Option<String>,
        remote_node_id: Option<String>,
        tx: Transaction,
    },
}
