use rtxp_collaborators::{FundedTx, PublishTxResult, TxRejectedReason, TxResult, TxWithWitnessData};
use rtxp_mempool_monitor::{spawn_mtm, MtmParams};
use rtxp_tasks::TaskExecutor;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    cleanup::retire_attempt,
    ctx::Ctx,
    event::Event,
    policy,
    stash::EventStash,
    state::{Attempt, AttemptSlot, State},
    timer::CheckFeeTimer,
};

/// Drives one RTxP instance from `CheckingPreconditions` to `Stopped`.
pub async fn run(mut ctx: Ctx, mut event_rx: mpsc::Receiver<Event>) {
    let mut stash = EventStash::new();
    let mut timer = CheckFeeTimer::new();
    let mut state = State::CheckingPreconditions;

    loop {
        state = match state {
            State::CheckingPreconditions => checking_preconditions(&mut ctx, &mut event_rx, &mut stash).await,
            State::CheckingTimeLocks { base } => checking_time_locks(&mut ctx, &mut event_rx, &mut stash, base).await,
            State::Funding { base } => funding(&mut ctx, &mut event_rx, &mut stash, base, None, None).await,
            State::Waiting { attempt } => waiting(&mut ctx, &mut event_rx, &mut stash, &mut timer, attempt).await,
            State::FundingReplacement { previous, base, target_feerate } => {
                funding(&mut ctx, &mut event_rx, &mut stash, base, Some(previous), Some(target_feerate)).await
            }
            State::Publishing { previous, bumped } => {
                publishing(&mut ctx, &mut event_rx, &mut stash, previous, bumped).await
            }
            State::CleaningUp { survivor, loser } => {
                cleaning_up(&mut ctx, &survivor, &loser).await;
                State::Waiting { attempt: survivor }
            }
            State::Stopping { outstanding } => {
                stopping(&mut ctx, &mut event_rx, outstanding).await;
                State::Stopped
            }
            State::Stopped => unreachable!("loop exits before Stopped is ever matched again"),
        };

        if matches!(state, State::Stopped) {
            timer.disarm();
            break;
        }
    }
}

fn spawn_attempt(ctx: &Ctx, slot: AttemptSlot, funded: &FundedTx) {
    let params = MtmParams {
        funded_tx: funded.clone(),
        input_outpoint: ctx.input_outpoint,
        desc: ctx.desc.clone(),
        min_depth_blocks: ctx.deps.config.min_depth_blocks,
        publish_id: ctx.log.publish_id,
        channel_id: ctx.log.channel_id.clone(),
        remote_node_id: ctx.log.remote_node_id.clone(),
    };
    let rx = spawn_mtm(&ctx.executor, ctx.deps.blockchain.clone(), ctx.deps.sink.clone(), params);
    forward_mtm_results(&ctx.executor, rx, slot, ctx.event_tx.clone());
}

fn forward_mtm_results(
    executor: &TaskExecutor,
    mut rx: mpsc::Receiver<TxResult>,
    slot: AttemptSlot,
    event_tx: mpsc::Sender<Event>,
) {
    executor.spawn_async("rtxp_mtm_forwarder", async move {
        while let Some(result) = rx.recv().await {
            if event_tx.send(Event::Mtm(slot, result)).await.is_err() {
                break;
            }
        }
    });
}

fn remaining_blocks(ctx: &Ctx) -> i64 {
    ctx.tx_info.confirm_before as i64 - ctx.current_height as i64
}

/// Looks up the feerate for the block target the remaining-blocks ladder
/// selects at `ctx.current_height`. The only failure mode is the fee
/// estimator itself erroring, which callers treat as "keep the previous
/// attempt's feerate" rather than a hard failure.
async fn current_target_feerate(ctx: &Ctx) -> Result<rtxp_primitives::Feerate, rtxp_collaborators::ClientError> {
    let block_target = ctx.deps.config.block_target_for_remaining(remaining_blocks(ctx));
    ctx.deps.fee_estimator.get_feerate_per_kw(block_target).await
}

/// Spawns a one-shot redelivery of an `Event` after a fixed delay. Used in
/// `Publishing` so an intermediate `TxResult` produced before the replaced
/// MTM learned about the RBF doesn't get acted on against stale state; by
/// the time it resurfaces the publisher has usually resolved which attempt
/// survived.
const STALE_RESULT_REDELIVERY_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

fn redeliver_after_delay(executor: &TaskExecutor, event_tx: mpsc::Sender<Event>, event: Event) {
    executor.spawn_async("rtxp_stale_result_redelivery", async move {
        tokio::time::sleep(STALE_RESULT_REDELIVERY_DELAY).await;
        let _ = event_tx.send(event).await;
    });
}

async fn checking_preconditions(ctx: &mut Ctx, rx: &mut mpsc::Receiver<Event>, stash: &mut EventStash) -> State {
    if stash.take_stop() {
        return State::Stopping { outstanding: vec![] };
    }

    let check = ctx
        .deps
        .pre_publisher
        .check(ctx.input_outpoint, &ctx.tx_info, &ctx.witness_data);
    match stash.run_to_completion(rx, check).await {
        Some(Ok(base)) => State::CheckingTimeLocks { base },
        Some(Err(reason)) => {
            warn!(log = %ctx.log, ?reason, "preconditions failed");
            ctx.reply(PublishTxResult::TxRejected { publish_id: ctx.log.publish_id, reason });
            State::Stopping { outstanding: vec![] }
        }
        None => State::Stopped,
    }
}

async fn checking_time_locks(
    ctx: &mut Ctx,
    rx: &mut mpsc::Receiver<Event>,
    stash: &mut EventStash,
    base: TxWithWitnessData,
) -> State {
    if stash.take_stop() {
        return State::Stopping { outstanding: vec![] };
    }

    let wait = ctx.deps.time_lock_monitor.wait_until_satisfied(&ctx.tx_info, &ctx.witness_data);
    match stash.run_to_completion(rx, wait).await {
        Some(()) => State::Funding { base },
        None => State::Stopped,
    }
}

/// Shared by the initial `Funding` and the bump-driven `FundingReplacement`:
/// the only difference is whether a `previous` attempt survives a funding
/// failure (kept, back to `Waiting`) or there is none (terminal rejection).
async fn funding(
    ctx: &mut Ctx,
    rx: &mut mpsc::Receiver<Event>,
    stash: &mut EventStash,
    base: TxWithWitnessData,
    previous: Option<Attempt>,
    target_feerate: Option<rtxp_primitives::Feerate>,
) -> State {
    if stash.take_stop() {
        let mut outstanding = Vec::new();
        outstanding.extend(previous);
        return State::Stopping { outstanding };
    }

    // `target_feerate` is already decided for a bump (carrying the forced
    // floor from `decide_bump`); the initial attempt has none yet and looks
    // it up fresh.
    let target_feerate = match target_feerate {
        Some(rate) => rate,
        None => match current_target_feerate(ctx).await {
            Ok(rate) => rate,
            Err(err) => {
                let reason = TxRejectedReason::FundingFailed(format!("fee estimate unavailable: {err}"));
                return match previous {
                    Some(previous) => {
                        warn!(log = %ctx.log, %err, "fee estimate failed, keeping previous attempt");
                        State::Waiting { attempt: previous }
                    }
                    None => {
                        warn!(log = %ctx.log, %err, "fee estimate failed, cannot fund initial attempt");
                        ctx.reply(PublishTxResult::TxRejected { publish_id: ctx.log.publish_id, reason });
                        State::Stopping { outstanding: vec![] }
                    }
                };
            }
        },
    };
    let previous_funded = previous.as_ref().map(|a| &a.funded);
    let fund = ctx.deps.funder.fund(&base, target_feerate, previous_funded);

    match stash.run_to_completion(rx, fund).await {
        Some(Ok(funded)) => {
            // The replacement must never share a slot with the attempt it is
            // replacing, however many RBF rounds deep that attempt's own
            // slot came from — otherwise two consecutive bumps can tag both
            // live attempts identically and `publishing()`'s slot-based
            // winner/loser discrimination breaks.
            let slot = match &previous {
                Some(previous) => previous.slot.other(),
                None => AttemptSlot::Previous,
            };
            spawn_attempt(ctx, slot, &funded);
            let new_attempt = Attempt { slot, funded };
            match previous {
                Some(previous) => State::Publishing { previous, bumped: new_attempt },
                None => State::Waiting { attempt: new_attempt },
            }
        }
        Some(Err(reason)) => match previous {
            Some(previous) => {
                warn!(log = %ctx.log, ?reason, "replacement funding failed, keeping previous attempt");
                State::Waiting { attempt: previous }
            }
            None => {
                warn!(log = %ctx.log, ?reason, "initial funding failed");
                ctx.reply(PublishTxResult::TxRejected { publish_id: ctx.log.publish_id, reason });
                State::Stopping { outstanding: vec![] }
            }
        },
        None => State::Stopped,
    }
}

async fn waiting(
    ctx: &mut Ctx,
    rx: &mut mpsc::Receiver<Event>,
    stash: &mut EventStash,
    timer: &mut CheckFeeTimer,
    attempt: Attempt,
) -> State {
    loop {
        let Some(event) = stash.next(rx).await else {
            return State::Stopped;
        };

        match event {
            Event::Stop => {
                timer.disarm();
                return State::Stopping { outstanding: vec![attempt] };
            }
            Event::Mtm(slot, result) if slot == attempt.slot => match result {
                TxResult::TxInMempool { block_height, .. } => {
                    ctx.current_height = ctx.current_height.max(block_height);
                    timer.arm(&ctx.executor, ctx.event_tx.clone(), ctx.deps.config.max_tx_publish_retry_delay_ms);
                }
                TxResult::TxRecentlyConfirmed { .. } => {}
                TxResult::TxDeeplyBuried { tx } => {
                    timer.disarm();
                    info!(log = %ctx.log, "attempt confirmed");
                    ctx.reply(PublishTxResult::TxConfirmed { tx });
                    return State::Stopping { outstanding: vec![] };
                }
                TxResult::TxConfirmed { tx } => {
                    timer.disarm();
                    ctx.reply(PublishTxResult::TxConfirmed { tx });
                    return State::Stopping { outstanding: vec![] };
                }
                TxResult::TxRejected { reason, .. } => {
                    timer.disarm();
                    warn!(log = %ctx.log, ?reason, "attempt rejected");
                    ctx.reply(PublishTxResult::TxRejected { publish_id: ctx.log.publish_id, reason });
                    return State::Stopping { outstanding: vec![] };
                }
            },
            Event::CheckFee => {
                let remaining = remaining_blocks(ctx);
                let r_curr = match current_target_feerate(ctx).await {
                    Ok(r) => r,
                    Err(err) => {
                        warn!(log = %ctx.log, %err, "fee estimate failed, skipping this bump check");
                        continue;
                    }
                };
                if let Some(target_feerate) =
                    policy::decide_bump(remaining, attempt.funded.feerate, r_curr, ctx.deps.config.bump_ratio)
                {
                    info!(log = %ctx.log, remaining, %target_feerate, "bumping fee, starting replacement funding");
                    return State::FundingReplacement {
                        previous: attempt,
                        base: TxWithWitnessData { tx: ctx.tx_info.signed_tx.clone() },
                        target_feerate,
                    };
                }
            }
            // Only reachable as an `Event::Mtm` for the slot that isn't
            // `attempt.slot`. That slot was already retired (its MTM sent
            // its one terminal result and exited) before `waiting` could
            // ever be re-entered with a single live attempt, so this can
            // only be a stale non-terminal result racing cleanup. It will
            // never become relevant again: drop it rather than stashing it,
            // or it would sit in the stash forever since nothing stops
            // reprocessing it once replayed.
            Event::Mtm(..) => {}
        }
    }
}

async fn publishing(
    ctx: &mut Ctx,
    rx: &mut mpsc::Receiver<Event>,
    stash: &mut EventStash,
    previous: Attempt,
    bumped: Attempt,
) -> State {
    loop {
        let Some(event) = stash.next(rx).await else {
            return State::Stopped;
        };

        match event {
            Event::Stop => {
                return State::Stopping { outstanding: vec![previous, bumped] };
            }
            Event::Mtm(slot, result) => match &result {
                // Per the RBF concurrency discipline: an intermediate result
                // may have been produced before its MTM learned of the
                // replacement. Don't fold it into either attempt's state;
                // redeliver it to self after a delay instead of acting on
                // stale information.
                TxResult::TxInMempool { .. } | TxResult::TxRecentlyConfirmed { .. } => {
                    redeliver_after_delay(&ctx.executor, ctx.event_tx.clone(), Event::Mtm(slot, result.clone()));
                }
                TxResult::TxDeeplyBuried { tx } | TxResult::TxConfirmed { tx } => {
                    let tx = tx.clone();
                    let other = if slot == previous.slot { bumped } else { previous };
                    info!(log = %ctx.log, "one attempt confirmed before the other was rejected; accepting, skipping cleanup");
                    ctx.reply(PublishTxResult::TxConfirmed { tx });
                    return State::Stopping { outstanding: vec![other] };
                }
                TxResult::TxRejected { reason, .. } => {
                    warn!(log = %ctx.log, ?reason, "one RBF attempt rejected, retiring it");
                    let (attempt, other) = if slot == previous.slot { (previous, bumped) } else { (bumped, previous) };
                    return State::CleaningUp { survivor: other, loser: attempt };
                }
            },
            other => stash.push_back(other),
        }
    }
}

async fn cleaning_up(ctx: &mut Ctx, survivor: &Attempt, loser: &Attempt) {
    retire_attempt(ctx.deps.blockchain.as_ref(), &loser.funded, Some(&survivor.funded), ctx.input_outpoint).await;
}

async fn stopping(ctx: &mut Ctx, rx: &mut mpsc::Receiver<Event>, outstanding: Vec<Attempt>) {
    for attempt in &outstanding {
        retire_attempt(ctx.deps.blockchain.as_ref(), &attempt.funded, None, ctx.input_outpoint).await;
    }

    // Drain any further Stop requests that arrive during cleanup: cooperative
    // shutdown tolerates repeats, it just ignores them.
    while let Ok(Some(_)) = tokio::time::timeout(tokio::time::Duration::from_millis(0), rx.recv()).await {}
    let _ = ctx;
}
