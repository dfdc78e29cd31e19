use bitcoin::Transaction;
use rtxp_primitives::{BlockHeight, OutputRef};
use tokio::sync::oneshot;

use crate::{result::PublishTxResult, witness::WitnessData};

/// The pre-signed base transaction together with its confirmation deadline.
#[derive(Debug, Clone)]
pub struct TxInfo {
    pub signed_tx: Transaction,
    pub confirm_before: BlockHeight,
}

/// Immutable input to a `Publish` command: everything an RTxP instance
/// needs to drive one replaceable transaction to a terminal result.
#[derive(Debug)]
pub struct ReplaceableTxCmd {
    /// The outpoint this transaction claims; not a wallet-owned UTXO.
    pub input_outpoint: OutputRef,
    pub tx_info: TxInfo,
    /// Human-readable tag, e.g. `"local-anchor"`, `"htlc-success"`.
    pub desc: String,
    /// Delivers the terminal `PublishTxResult` exactly once.
    pub reply_to: oneshot::Sender<PublishTxResult>,
    pub witness_data: WitnessData,
}
