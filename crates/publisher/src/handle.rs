use rtxp_collaborators::ReplaceableTxCmd;
use rtxp_primitives::LogContext;
use rtxp_tasks::TaskExecutor;
use tokio::sync::mpsc;

use crate::{ctx::Ctx, deps::RtxpDeps, event::Event, task};

/// Bounded so a slow or wedged RTxP can't let its inbox grow without limit;
/// sized well above the `EventStash` capacity since the stash is what
/// actually absorbs bursts during an atomic transition.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handle to a running RTxP instance. The only thing a caller can do with
/// one is request cooperative shutdown; the terminal result was already
/// handed over as `cmd.reply_to` at spawn time.
#[derive(Clone)]
pub struct RtxpHandle {
    event_tx: mpsc::Sender<Event>,
}

impl RtxpHandle {
    /// Requests that the instance stop. Cooperative: the publisher finishes
    /// whatever atomic transition it's in, delivers its terminal result if
    /// it hasn't already, then abandons and unlocks every outstanding
    /// attempt before actually exiting. Safe to call more than once, and
    /// safe to call after the instance has already stopped.
    pub async fn stop(&self) {
        let _ = self.event_tx.send(Event::Stop).await;
    }
}

/// Spawns one RTxP instance to drive `cmd` from `CheckingPreconditions` to
/// `Stopped`, seeding its chain-tip view with `current_height` (normally
/// `deps.blockchain.get_block_count()`, queried by the caller so a failure
/// to reach the node surfaces before any attempt is funded).
///
/// Left to run to completion on its own, the instance delivers exactly one
/// `PublishTxResult` to `cmd.reply_to` before cleaning up every wallet
/// outpoint it locked and stopping. A caller-initiated `stop()` pre-empts
/// that: it is an abandon, not an alternate terminal result, so it cleans
/// up the outstanding attempt(s) and exits without ever sending on
/// `cmd.reply_to` — the oneshot is simply dropped. A caller that calls
/// `stop()` already knows why the instance ended and shouldn't wait on the
/// reply.
pub fn spawn_rtxp(
    executor: &TaskExecutor,
    deps: RtxpDeps,
    cmd: ReplaceableTxCmd,
    log: LogContext,
    current_height: rtxp_primitives::BlockHeight,
) -> RtxpHandle {
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let ctx = Ctx::new(
        executor.clone(),
        deps,
        cmd.input_outpoint,
        cmd.tx_info,
        cmd.desc,
        cmd.witness_data,
        log,
        event_tx.clone(),
        current_height,
        cmd.reply_to,
    );

    executor.spawn_async("rtxp", async move {
        task::run(ctx, event_rx).await;
    });

    RtxpHandle { event_tx }
}
