use rtxp_collaborators::{PublishTxResult, TxInfo, WitnessData};
use rtxp_primitives::{LogContext, OutputRef};
use rtxp_tasks::TaskExecutor;
use tokio::sync::{mpsc, oneshot};

use crate::{deps::RtxpDeps, event::Event};

/// Everything an RTxP run needs that doesn't change across states: its
/// dependencies, the immutable parts of the command it's publishing, and
/// the handle used to deliver the one terminal result.
pub struct Ctx {
    pub executor: TaskExecutor,
    pub deps: RtxpDeps,
    pub input_outpoint: OutputRef,
    pub tx_info: TxInfo,
    pub desc: String,
    pub witness_data: WitnessData,
    pub log: LogContext,
    pub event_tx: mpsc::Sender<Event>,
    /// Best-known chain tip, seeded at construction and kept current by
    /// every `TxInMempool` report the owned MTMs forward. Drives both the
    /// target-feerate lookup and the `remaining <= 6` bump-deadline check.
    pub current_height: rtxp_primitives::BlockHeight,
    reply_to: Option<oneshot::Sender<PublishTxResult>>,
}

impl Ctx {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        executor: TaskExecutor,
        deps: RtxpDeps,
        input_outpoint: OutputRef,
        tx_info: TxInfo,
        desc: String,
        witness_data: WitnessData,
        log: LogContext,
        event_tx: mpsc::Sender<Event>,
        current_height: rtxp_primitives::BlockHeight,
        reply_to: oneshot::Sender<PublishTxResult>,
    ) -> Self {
        Self {
            executor,
            deps,
            input_outpoint,
            tx_info,
            desc,
            witness_data,
            log,
            event_tx,
            current_height,
            reply_to: Some(reply_to),
        }
    }

    /// Delivers the terminal result. Idempotent beyond the first call: a
    /// second call (e.g. from a defensive double-report) is a silent no-op
    /// rather than a panic, since the channel was already consumed.
    pub fn reply(&mut self, result: PublishTxResult) {
        if let Some(reply_to) = self.reply_to.take() {
            let _ = reply_to.send(result);
        }
    }
}
