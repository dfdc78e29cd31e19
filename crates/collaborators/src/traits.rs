use async_trait::async_trait;
use bitcoin::Transaction;
use rtxp_primitives::{BlockHeight, Feerate, OutputRef};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    cmd::TxInfo, funded_tx::FundedTx, result::TxRejectedReason, witness::WitnessData,
};

/// Error surfaced by `publish_transaction`. The message is the only thing
/// the core inspects; two substrings in it are meaningful (see
/// `classify_publish_error` in the RPC client).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PublishError(pub String);

/// Generic failure talking to the blockchain client or fee estimator.
#[derive(Debug, Clone, Error)]
#[error("blockchain client error: {0}")]
pub struct ClientError(pub String);

/// Everything MTM and RTxP need from the node: publish, confirmation and
/// spendability queries, abandon, unlock, and the block-height source.
///
/// MTM/RTxP depend only on this trait, never on a concrete RPC client, so
/// they stay testable against in-memory fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockchainClient: Send + Sync {
    async fn publish_transaction(&self, tx: &Transaction) -> Result<(), PublishError>;

    async fn get_tx_confirmations(
        &self,
        txid: bitcoin::Txid,
    ) -> Result<Option<u32>, ClientError>;

    async fn is_transaction_output_spendable(
        &self,
        outpoint: OutputRef,
        include_mempool: bool,
    ) -> Result<bool, ClientError>;

    /// No-op if the transaction is mined or still live; failures are
    /// ignored by callers.
    async fn abandon_transaction(&self, txid: bitcoin::Txid) -> Result<(), ClientError>;

    async fn unlock_outpoints(&self, outpoints: &[OutputRef]) -> Result<(), ClientError>;

    async fn get_block_count(&self) -> Result<BlockHeight, ClientError>;

    /// Stream of block-height updates. Each call returns a fresh receiver;
    /// callers are expected to subscribe once per MTM/RTxP lifetime.
    fn subscribe_block_count(&self) -> mpsc::Receiver<BlockHeight>;
}

/// Feerate source for the target-feerate policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeeEstimator: Send + Sync {
    async fn get_feerate_per_kw(&self, block_target: u16) -> Result<Feerate, ClientError>;
}

/// Output of the pre-publisher: the base transaction with witness data
/// resolved, ready for funding.
#[derive(Debug, Clone)]
pub struct TxWithWitnessData {
    pub tx: Transaction,
}

/// Checks parent confirmations, signatures, dust, and anchor-specific
/// preconditions before a command is allowed to proceed to funding.
///
/// Takes the command's fields rather than the whole `ReplaceableTxCmd` so
/// collaborators never see `reply_to` — only the publisher itself may use
/// it, and only once.
#[async_trait]
pub trait TxPrePublisher: Send + Sync {
    async fn check(
        &self,
        input_outpoint: OutputRef,
        tx_info: &TxInfo,
        witness_data: &WitnessData,
    ) -> Result<TxWithWitnessData, TxRejectedReason>;
}

/// Adds wallet inputs/outputs to a base transaction at a target feerate and
/// signs it, optionally replacing a previous attempt.
#[async_trait]
pub trait TxFunder: Send + Sync {
    async fn fund(
        &self,
        base: &TxWithWitnessData,
        target_feerate: Feerate,
        previous: Option<&FundedTx>,
    ) -> Result<FundedTx, TxRejectedReason>;
}

/// Waits until a transaction's absolute/relative time locks are satisfied.
#[async_trait]
pub trait TimeLockMonitor: Send + Sync {
    async fn wait_until_satisfied(&self, tx_info: &TxInfo, witness_data: &WitnessData);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_fee_estimator_returns_configured_feerate() {
        let mut mock = MockFeeEstimator::new();
        mock.expect_get_feerate_per_kw()
            .withf(|target| *target == 6)
            .returning(|_| Ok(Feerate::from_sat_per_kw(2000)));

        let result = mock.get_feerate_per_kw(6).await.unwrap();
        assert_eq!(result, Feerate::from_sat_per_kw(2000));
    }

    #[tokio::test]
    async fn mock_blockchain_client_reports_publish_error() {
        let mut mock = MockBlockchainClient::new();
        mock.expect_publish_transaction()
            .returning(|_| Err(PublishError("rejecting replacement".to_string())));

        let tx = bitcoin::Transaction {
            version: bitcoin::transaction::Version::TWO,
            lock_time: bitcoin::absolute::LockTime::ZERO,
            input: vec![],
            output: vec![],
        };
        let err = mock.publish_transaction(&tx).await.unwrap_err();
        assert_eq!(err.0, "rejecting replacement");
    }
}
