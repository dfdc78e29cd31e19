use std::sync::Arc;

use bitcoin::{absolute::LockTime, transaction::Version, OutPoint, Transaction, TxIn, Txid};
use rtxp_collaborators::{BlockchainClient, FundedTx, TxRejectedReason, TxResult};
use rtxp_mempool_monitor::{spawn_mtm, MtmParams};
use rtxp_primitives::{Feerate, OutputRef, PublishId};
use rtxp_rpc_client::FakeBlockchainClient;
use rtxp_status::VecEventSink;
use rtxp_tasks::TaskManager;

fn funded_tx(input_outpoint: OutPoint) -> FundedTx {
    FundedTx {
        signed_tx: Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: input_outpoint,
                ..Default::default()
            }],
            output: vec![],
        },
        fee: 500,
        feerate: Feerate::from_sat_per_kw(2000),
    }
}

fn params(input_outpoint: OutputRef, funded: FundedTx) -> MtmParams {
    MtmParams {
        funded_tx: funded,
        input_outpoint,
        desc: "local-anchor".to_string(),
        min_depth_blocks: 3,
        publish_id: PublishId::new(),
        channel_id: Some("chan-1".to_string()),
        remote_node_id: None,
    }
}

#[tokio::test]
async fn happy_path_reaches_deeply_buried() {
    let manager = TaskManager::new();
    let executor = manager.executor();
    let client = FakeBlockchainClient::new();
    let sink = Arc::new(VecEventSink::new());

    let txid = Txid::from_slice(&[9u8; 32]).unwrap();
    let input_outpoint = OutputRef::new(txid, 0);
    let tx = funded_tx(input_outpoint.outpoint());

    let mut rx = spawn_mtm(
        &executor,
        client.clone() as Arc<dyn BlockchainClient>,
        sink,
        params(input_outpoint, tx.clone()),
    );

    let published_txid = tx.txid();
    client.set_confirmations(published_txid, 0);
    client.push_block(100).await;
    let first = rx.recv().await.unwrap();
    assert!(matches!(first, TxResult::TxInMempool { .. }));

    client.set_confirmations(published_txid, 3);
    client.push_block(103).await;
    let second = rx.recv().await.unwrap();
    assert!(matches!(second, TxResult::TxDeeplyBuried { .. }));

    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn replacement_rejection_is_reported_immediately() {
    let manager = TaskManager::new();
    let executor = manager.executor();
    let client = FakeBlockchainClient::new();
    let sink = Arc::new(VecEventSink::new());

    client.set_publish_result(Err("txn-mempool-conflict, rejecting replacement".to_string()));

    let txid = Txid::from_slice(&[3u8; 32]).unwrap();
    let input_outpoint = OutputRef::new(txid, 0);
    let tx = funded_tx(input_outpoint.outpoint());

    let mut rx = spawn_mtm(
        &executor,
        client as Arc<dyn BlockchainClient>,
        sink,
        params(input_outpoint, tx),
    );

    let result = rx.recv().await.unwrap();
    match result {
        TxResult::TxRejected { reason, .. } => {
            assert_eq!(reason, TxRejectedReason::ConflictingTxUnconfirmed);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn eviction_probes_input_status() {
    let manager = TaskManager::new();
    let executor = manager.executor();
    let client = FakeBlockchainClient::new();
    let sink = Arc::new(VecEventSink::new());

    let txid = Txid::from_slice(&[7u8; 32]).unwrap();
    let input_outpoint = OutputRef::new(txid, 0);
    let tx = funded_tx(input_outpoint.outpoint());
    let published_txid = tx.txid();

    // no confirmations entry -> get_tx_confirmations returns None (evicted)
    client.set_confirmations(input_outpoint.txid(), 5);
    client.set_spendable(input_outpoint, false, false);

    let mut rx = spawn_mtm(
        &executor,
        client.clone() as Arc<dyn BlockchainClient>,
        sink,
        params(input_outpoint, tx),
    );

    client.clear_confirmations(&published_txid);
    client.push_block(50).await;

    let result = rx.recv().await.unwrap();
    match result {
        TxResult::TxRejected { reason, .. } => {
            assert_eq!(reason, TxRejectedReason::ConflictingTxConfirmed);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
