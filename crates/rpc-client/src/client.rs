use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bitcoin::{Transaction, Txid};
use bitcoincore_rpc_async::{Auth, Client, RpcApi};
use rtxp_collaborators::{BlockchainClient, ClientError, PublishError};
use rtxp_common::retry::{policies::ExponentialBackoff, retry_with_backoff, DEFAULT_CALL_MAX_RETRIES};
use rtxp_primitives::{BlockHeight, OutputRef};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::RpcClientError;

/// How often `subscribe_block_count` polls `get_block_count`. The node has
/// no push transport in this client, so a new height is only ever noticed
/// on the next tick; short enough that a `CheckFee` near the confirmation
/// deadline isn't delayed by more than a couple of seconds.
const BLOCK_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Thin wrapper around [`bitcoincore_rpc_async::Client`] implementing
/// [`BlockchainClient`] against a Bitcoin-Core-compatible node.
pub struct BitcoinRpcClient {
    inner: Arc<Client>,
}

impl BitcoinRpcClient {
    pub async fn new(
        url: String,
        username: String,
        password: String,
    ) -> Result<Self, RpcClientError> {
        let auth = Auth::UserPass(username, password);
        let inner = Client::new(url, auth)
            .await
            .map_err(RpcClientError::from)?;
        Ok(Self { inner: Arc::new(inner) })
    }

    pub(crate) fn inner(&self) -> &Client {
        &self.inner
    }
}

#[async_trait]
impl BlockchainClient for BitcoinRpcClient {
    async fn publish_transaction(&self, tx: &Transaction) -> Result<(), PublishError> {
        self.inner
            .send_raw_transaction(tx)
            .await
            .map(|_| ())
            .map_err(|e| RpcClientError::from(e).into())
    }

    async fn get_tx_confirmations(&self, txid: Txid) -> Result<Option<u32>, ClientError> {
        // A transient network blip and "node doesn't know this txid" surface
        // through the same error type, so only the retries are allowed to
        // absorb the former; once they're exhausted the call still falls
        // back to "not found" rather than propagating the error, matching
        // how MTM/RTxP already treat an unknown txid as still-unconfirmed.
        let result = retry_with_backoff(
            "get_raw_transaction_info",
            DEFAULT_CALL_MAX_RETRIES,
            &ExponentialBackoff::default(),
            || self.inner.get_raw_transaction_info(&txid, None),
        )
        .await;
        match result {
            Ok(info) => Ok(Some(info.confirmations.unwrap_or(0) as u32)),
            Err(_) => {
                debug!(%txid, "get_raw_transaction_info: not found");
                Ok(None)
            }
        }
    }

    async fn is_transaction_output_spendable(
        &self,
        outpoint: OutputRef,
        include_mempool: bool,
    ) -> Result<bool, ClientError> {
        retry_with_backoff(
            "get_tx_out",
            DEFAULT_CALL_MAX_RETRIES,
            &ExponentialBackoff::default(),
            || self.inner.get_tx_out(&outpoint.txid(), outpoint.vout(), Some(include_mempool)),
        )
        .await
        .map(|utxo| utxo.is_some())
        .map_err(|e| RpcClientError::from(e).into())
    }

    async fn abandon_transaction(&self, txid: Txid) -> Result<(), ClientError> {
        if let Err(err) = self.inner.abandon_transaction(&txid).await {
            warn!(%txid, error = %err, "abandon_transaction failed, ignoring");
        }
        Ok(())
    }

    async fn unlock_outpoints(&self, outpoints: &[OutputRef]) -> Result<(), ClientError> {
        if outpoints.is_empty() {
            return Ok(());
        }
        let outpoints: Vec<_> = outpoints.iter().map(|o| o.outpoint()).collect();
        self.inner
            .unlock_unspent(&outpoints)
            .await
            .map(|_| ())
            .map_err(|e| RpcClientError::from(e).into())
    }

    async fn get_block_count(&self) -> Result<BlockHeight, ClientError> {
        retry_with_backoff(
            "get_block_count",
            DEFAULT_CALL_MAX_RETRIES,
            &ExponentialBackoff::default(),
            || self.inner.get_block_count(),
        )
        .await
        .map_err(|e| RpcClientError::from(e).into())
    }

    fn subscribe_block_count(&self) -> mpsc::Receiver<BlockHeight> {
        // The `bitcoincore_rpc_async` client has no push notification
        // transport, so this polls instead of a ZMQ `hashblock` subscriber.
        // Spawned directly rather than via `TaskExecutor`: it outlives no
        // particular RTxP/MTM instance and simply exits once every
        // receiver is dropped.
        let (tx, rx) = mpsc::channel(1);
        let client = self.inner.clone();
        tokio::spawn(async move {
            let mut last_seen: Option<BlockHeight> = None;
            let mut interval = tokio::time::interval(BLOCK_POLL_INTERVAL);
            loop {
                interval.tick().await;
                match client.get_block_count().await {
                    Ok(height) if Some(height) != last_seen => {
                        last_seen = Some(height);
                        if tx.send(height).await.is_err() {
                            debug!("block count subscriber dropped, stopping poll");
                            return;
                        }
                    }
                    Ok(_) => {}
                    Err(err) => warn!(%err, "get_block_count poll failed, retrying"),
                }
            }
        });
        rx
    }
}
