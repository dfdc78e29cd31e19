use std::collections::HashSet;

use rtxp_collaborators::{BlockchainClient, FundedTx};
use rtxp_primitives::OutputRef;
use tracing::warn;

/// `inputs(failed) \ inputs(survivor) \ {input_outpoint}`, per the Cleanup
/// section: UTXOs exclusive to the retired attempt, excluding the
/// non-wallet-owned anchor input.
pub fn utxos_to_unlock(
    failed: &FundedTx,
    survivor: Option<&FundedTx>,
    input_outpoint: OutputRef,
) -> Vec<OutputRef> {
    let survivor_inputs: HashSet<OutputRef> = survivor.map(|s| s.inputs().collect()).unwrap_or_default();
    failed
        .inputs()
        .filter(|o| *o != input_outpoint && !survivor_inputs.contains(o))
        .collect()
}

/// Retires one broadcast attempt: abandons it in the wallet (failures
/// ignored, it may already be mined or still live) and unlocks whatever
/// UTXOs were exclusively its own.
pub async fn retire_attempt(
    client: &dyn BlockchainClient,
    failed: &FundedTx,
    survivor: Option<&FundedTx>,
    input_outpoint: OutputRef,
) {
    let txid = failed.txid();
    if let Err(err) = client.abandon_transaction(txid).await {
        warn!(%txid, error = %err, "abandon_transaction failed, ignoring");
    }

    let to_unlock = utxos_to_unlock(failed, survivor, input_outpoint);
    if !to_unlock.is_empty() {
        if let Err(err) = client.unlock_outpoints(&to_unlock).await {
            warn!(error = %err, count = to_unlock.len(), "unlock_outpoints failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{absolute::LockTime, transaction::Version, OutPoint, Transaction, TxIn, Txid};
    use rtxp_primitives::Feerate;

    use super::*;

    fn tx_with_inputs(outpoints: &[OutPoint]) -> FundedTx {
        FundedTx {
            signed_tx: Transaction {
                version: Version::TWO,
                lock_time: LockTime::ZERO,
                input: outpoints
                    .iter()
                    .map(|o| TxIn { previous_output: *o, ..Default::default() })
                    .collect(),
                output: vec![],
            },
            fee: 0,
            feerate: Feerate::from_sat_per_kw(0),
        }
    }

    #[test]
    fn excludes_survivor_inputs_and_anchor() {
        let anchor_txid = Txid::from_slice(&[1u8; 32]).unwrap();
        let anchor = OutputRef::new(anchor_txid, 0);
        let shared_wallet_input = OutputRef::new(Txid::from_slice(&[2u8; 32]).unwrap(), 0);
        let exclusive_wallet_input = OutputRef::new(Txid::from_slice(&[3u8; 32]).unwrap(), 1);

        let failed = tx_with_inputs(&[
            anchor.outpoint(),
            shared_wallet_input.outpoint(),
            exclusive_wallet_input.outpoint(),
        ]);
        let survivor = tx_with_inputs(&[anchor.outpoint(), shared_wallet_input.outpoint()]);

        let unlock = utxos_to_unlock(&failed, Some(&survivor), anchor);
        assert_eq!(unlock, vec![exclusive_wallet_input]);
    }

    #[test]
    fn no_survivor_unlocks_everything_but_anchor() {
        let anchor_txid = Txid::from_slice(&[4u8; 32]).unwrap();
        let anchor = OutputRef::new(anchor_txid, 0);
        let wallet_input = OutputRef::new(Txid::from_slice(&[5u8; 32]).unwrap(), 0);

        let failed = tx_with_inputs(&[anchor.outpoint(), wallet_input.outpoint()]);

        let unlock = utxos_to_unlock(&failed, None, anchor);
        assert_eq!(unlock, vec![wallet_input]);
    }
}
