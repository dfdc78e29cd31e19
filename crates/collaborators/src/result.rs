use bitcoin::{Transaction, Txid};
use rtxp_primitives::{BlockHeight, PublishId};

/// Why a broadcast attempt ended without confirming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxRejectedReason {
    /// A conflicting transaction is unconfirmed in the mempool.
    ConflictingTxUnconfirmed,
    /// A conflicting transaction has confirmed; funds are lost to it.
    ConflictingTxConfirmed,
    /// The claimed input is no longer owned by the wallet.
    WalletInputGone,
    /// The blockchain client returned an error that doesn't match any
    /// recognized pattern.
    UnknownTxFailure,
    /// Transient: the probe that would classify the failure itself failed.
    /// MTM re-checks on the next block.
    TxSkipped { retry_next_block: bool },
    /// The pre-publisher rejected the command before funding was attempted.
    PreconditionsFailed(String),
    /// The funder could not produce a `FundedTx`.
    FundingFailed(String),
}

/// Status stream MTM reports back to its parent RTxP for a single
/// broadcast attempt.
#[derive(Debug, Clone)]
pub enum TxResult {
    /// Seen in the mempool at the given block height; not yet at
    /// `min_depth_blocks` confirmations.
    TxInMempool { txid: Txid, block_height: BlockHeight },
    /// Confirmed, but short of `min_depth_blocks`.
    TxRecentlyConfirmed { txid: Txid, confirmations: u32 },
    /// Reached `min_depth_blocks`; about to report `TxConfirmed` as the
    /// terminal result.
    TxDeeplyBuried { tx: Transaction },
    /// Terminal: confirmed to the required depth.
    TxConfirmed { tx: Transaction },
    /// Terminal: will not confirm.
    TxRejected { txid: Txid, reason: TxRejectedReason },
}

/// Terminal result delivered exactly once to an RTxP caller's `reply_to`.
#[derive(Debug, Clone)]
pub enum PublishTxResult {
    TxConfirmed { tx: Transaction },
    TxRejected {
        publish_id: PublishId,
        reason: TxRejectedReason,
    },
}
