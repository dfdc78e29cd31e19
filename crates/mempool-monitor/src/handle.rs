use std::sync::Arc;

use rtxp_collaborators::{BlockchainClient, TxResult};
use rtxp_status::EventSink;
use rtxp_tasks::TaskExecutor;
use tokio::sync::mpsc;

use crate::{params::MtmParams, task};

/// Spawns one MTM run and returns the channel its `TxResult`s arrive on.
/// The task exits after sending exactly one terminal result (`TxConfirmed`,
/// `TxDeeplyBuried`, or `TxRejected`).
pub fn spawn_mtm(
    executor: &TaskExecutor,
    client: Arc<dyn BlockchainClient>,
    sink: Arc<dyn EventSink>,
    params: MtmParams,
) -> mpsc::Receiver<TxResult> {
    let (tx, rx) = mpsc::channel(16);
    executor.spawn_critical_async("mempool_monitor", async move {
        task::run(client, sink, params, tx).await.map_err(Into::into)
    });
    rx
}
