use std::sync::Arc;

use rtxp_collaborators::{
    classify_publish_error, BlockchainClient, PublishErrorClass, TxRejectedReason, TxResult,
};
use rtxp_status::{EventSink, PublisherEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{decision::classify_input_status, error::MonitorError, params::MtmParams};

/// Publishes `params.funded_tx` and reports its status until a terminal
/// `TxResult` is produced, exactly once.
pub async fn run(
    client: Arc<dyn BlockchainClient>,
    sink: Arc<dyn EventSink>,
    params: MtmParams,
    results: mpsc::Sender<TxResult>,
) -> Result<(), MonitorError> {
    let txid = params.funded_tx.txid();

    if let Err(publish_err) = client.publish_transaction(&params.funded_tx.signed_tx).await {
        let reason = match classify_publish_error(&publish_err.0) {
            PublishErrorClass::ConflictingTxUnconfirmed => TxRejectedReason::ConflictingTxUnconfirmed,
            PublishErrorClass::NeedsInputProbe => {
                probe_input_status(client.as_ref(), params.input_outpoint).await
            }
            PublishErrorClass::Unknown => TxRejectedReason::UnknownTxFailure,
        };
        warn!(%txid, error = %publish_err, ?reason, "publish_transaction failed");
        send_terminal(&results, TxResult::TxRejected { txid, reason }).await?;
        return Ok(());
    }

    sink.emit(PublisherEvent::TransactionPublished {
        publish_id: params.publish_id,
        channel_id: params.channel_id.clone(),
        remote_node_id: params.remote_node_id.clone(),
        tx: params.funded_tx.signed_tx.clone(),
        fee: params.funded_tx.fee,
        tx_desc: params.desc.clone(),
    });
    info!(%txid, desc = %params.desc, "transaction published");

    let mut block_rx = client.subscribe_block_count();
    loop {
        let Some(block_height) = block_rx.recv().await else {
            debug!(%txid, "block-count source closed, stopping monitor");
            return Ok(());
        };

        match client.get_tx_confirmations(txid).await {
            Ok(Some(0)) => {
                let _ = results
                    .send(TxResult::TxInMempool { txid, block_height })
                    .await;
            }
            Ok(Some(n)) if n >= params.min_depth_blocks => {
                sink.emit(PublisherEvent::TransactionConfirmed {
                    publish_id: params.publish_id,
                    channel_id: params.channel_id.clone(),
                    remote_node_id: params.remote_node_id.clone(),
                    tx: params.funded_tx.signed_tx.clone(),
                });
                info!(%txid, confirmations = n, "transaction deeply buried");
                send_terminal(
                    &results,
                    TxResult::TxDeeplyBuried {
                        tx: params.funded_tx.signed_tx.clone(),
                    },
                )
                .await?;
                return Ok(());
            }
            Ok(Some(n)) => {
                let _ = results
                    .send(TxResult::TxRecentlyConfirmed {
                        txid,
                        confirmations: n,
                    })
                    .await;
            }
            Ok(None) => {
                let reason = probe_input_status(client.as_ref(), params.input_outpoint).await;
                send_terminal(&results, TxResult::TxRejected { txid, reason }).await?;
                return Ok(());
            }
            Err(err) => {
                warn!(%txid, error = %err, "get_tx_confirmations failed, retrying next block");
            }
        }
    }
}

/// Concurrently gathers the three facts that disambiguate why a claimed
/// input is no longer usable, then classifies them. On any probe RPC
/// failure, the result is `TxSkipped{retry_next_block: true}` rather than a
/// terminal reason.
async fn probe_input_status(
    client: &dyn BlockchainClient,
    outpoint: rtxp_primitives::OutputRef,
) -> TxRejectedReason {
    let (parent_confs, spendable_excl, spendable_incl) = tokio::join!(
        client.get_tx_confirmations(outpoint.txid()),
        client.is_transaction_output_spendable(outpoint, false),
        client.is_transaction_output_spendable(outpoint, true),
    );

    match (parent_confs, spendable_excl, spendable_incl) {
        (Ok(confs), Ok(excl), Ok(incl)) => classify_input_status(confs, excl, incl),
        _ => TxRejectedReason::TxSkipped {
            retry_next_block: true,
        },
    }
}

async fn send_terminal(
    results: &mpsc::Sender<TxResult>,
    result: TxResult,
) -> Result<(), MonitorError> {
    results.send(result).await.map_err(|_| MonitorError::ParentGone)
}
