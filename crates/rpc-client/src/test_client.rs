use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bitcoin::{Transaction, Txid};
use rtxp_collaborators::{BlockchainClient, ClientError, FeeEstimator, PublishError};
use rtxp_primitives::{BlockHeight, Feerate, OutputRef};
use tokio::sync::mpsc;

/// In-memory `BlockchainClient`/`FeeEstimator` fake for driving RTxP/MTM
/// actor-loop tests without a real node. Every queryable field is a handle
/// the test can mutate mid-run.
pub struct FakeBlockchainClient {
    inner: Mutex<FakeState>,
    block_count_subscribers: Mutex<Vec<mpsc::Sender<BlockHeight>>>,
}

struct FakeState {
    confirmations: std::collections::HashMap<Txid, u32>,
    spendable_excl_mempool: std::collections::HashMap<OutputRef, bool>,
    spendable_incl_mempool: std::collections::HashMap<OutputRef, bool>,
    feerate_by_target: std::collections::HashMap<u16, Feerate>,
    publish_result: Option<Result<(), String>>,
    unlocked: Vec<OutputRef>,
    abandoned: Vec<Txid>,
}

impl FakeBlockchainClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FakeState {
                confirmations: Default::default(),
                spendable_excl_mempool: Default::default(),
                spendable_incl_mempool: Default::default(),
                feerate_by_target: Default::default(),
                publish_result: None,
                unlocked: Vec::new(),
                abandoned: Vec::new(),
            }),
            block_count_subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn set_confirmations(&self, txid: Txid, confs: u32) {
        self.inner.lock().unwrap().confirmations.insert(txid, confs);
    }

    pub fn clear_confirmations(&self, txid: &Txid) {
        self.inner.lock().unwrap().confirmations.remove(txid);
    }

    pub fn set_spendable(&self, outpoint: OutputRef, excl_mempool: bool, incl_mempool: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.spendable_excl_mempool.insert(outpoint, excl_mempool);
        inner.spendable_incl_mempool.insert(outpoint, incl_mempool);
    }

    pub fn set_feerate(&self, block_target: u16, feerate: Feerate) {
        self.inner
            .lock()
            .unwrap()
            .feerate_by_target
            .insert(block_target, feerate);
    }

    pub fn set_publish_result(&self, result: Result<(), String>) {
        self.inner.lock().unwrap().publish_result = Some(result);
    }

    pub fn unlocked_outpoints(&self) -> Vec<OutputRef> {
        self.inner.lock().unwrap().unlocked.clone()
    }

    pub fn abandoned_txids(&self) -> Vec<Txid> {
        self.inner.lock().unwrap().abandoned.clone()
    }

    /// Delivers `height` to every outstanding `subscribe_block_count`
    /// receiver, mirroring the real client's poller fanning one node-wide
    /// height out to each MTM/RTxP instance that subscribed.
    pub async fn push_block(&self, height: BlockHeight) {
        let subscribers = self.block_count_subscribers.lock().unwrap().clone();
        for tx in subscribers {
            let _ = tx.send(height).await;
        }
    }
}

#[async_trait]
impl BlockchainClient for FakeBlockchainClient {
    async fn publish_transaction(&self, _tx: &Transaction) -> Result<(), PublishError> {
        match self.inner.lock().unwrap().publish_result.clone() {
            Some(Ok(())) | None => Ok(()),
            Some(Err(msg)) => Err(PublishError(msg)),
        }
    }

    async fn get_tx_confirmations(&self, txid: Txid) -> Result<Option<u32>, ClientError> {
        Ok(self.inner.lock().unwrap().confirmations.get(&txid).copied())
    }

    async fn is_transaction_output_spendable(
        &self,
        outpoint: OutputRef,
        include_mempool: bool,
    ) -> Result<bool, ClientError> {
        let inner = self.inner.lock().unwrap();
        let map = if include_mempool {
            &inner.spendable_incl_mempool
        } else {
            &inner.spendable_excl_mempool
        };
        Ok(map.get(&outpoint).copied().unwrap_or(false))
    }

    async fn abandon_transaction(&self, txid: Txid) -> Result<(), ClientError> {
        self.inner.lock().unwrap().abandoned.push(txid);
        Ok(())
    }

    async fn unlock_outpoints(&self, outpoints: &[OutputRef]) -> Result<(), ClientError> {
        self.inner.lock().unwrap().unlocked.extend_from_slice(outpoints);
        Ok(())
    }

    async fn get_block_count(&self) -> Result<BlockHeight, ClientError> {
        Ok(0)
    }

    fn subscribe_block_count(&self) -> mpsc::Receiver<BlockHeight> {
        let (tx, rx) = mpsc::channel(64);
        self.block_count_subscribers.lock().unwrap().push(tx);
        rx
    }
}

#[async_trait]
impl FeeEstimator for FakeBlockchainClient {
    async fn get_feerate_per_kw(&self, block_target: u16) -> Result<Feerate, ClientError> {
        self.inner
            .lock()
            .unwrap()
            .feerate_by_target
            .get(&block_target)
            .copied()
            .ok_or_else(|| ClientError(format!("no fake feerate set for target {block_target}")))
    }
}
