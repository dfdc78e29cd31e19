use bitcoin::Transaction;
use rtxp_primitives::{Feerate, OutputRef};

/// Output of the transaction funder: a fully signed transaction ready to
/// broadcast, at the feerate the funder actually achieved.
#[derive(Debug, Clone)]
pub struct FundedTx {
    pub signed_tx: Transaction,
    pub fee: u64,
    pub feerate: Feerate,
}

impl FundedTx {
    pub fn txid(&self) -> bitcoin::Txid {
        self.signed_tx.compute_txid()
    }

    /// Every outpoint this transaction spends, including the claimed
    /// `input_outpoint`.
    pub fn inputs(&self) -> impl Iterator<Item = OutputRef> + '_ {
        self.signed_tx
            .input
            .iter()
            .map(|txin| OutputRef::from(txin.previous_output))
    }
}
