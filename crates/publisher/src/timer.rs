use rand::Rng;
use rtxp_tasks::TaskExecutor;
use tokio::{sync::mpsc, task::JoinHandle, time::Duration};

use crate::event::Event;

/// Single-slot, keyed timer for `CheckFee`: re-arming cancels whatever was
/// pending so at most one fires per attempt, matching the `CheckFeeKey`
/// design note (a plain `Option<JoinHandle>` slot, not a timer wheel).
pub struct CheckFeeTimer {
    handle: Option<JoinHandle<()>>,
}

impl CheckFeeTimer {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Arms a `CheckFee` delivery after a random delay in
    /// `[1, max_delay_ms]`, cancelling any timer already pending.
    pub fn arm(&mut self, executor: &TaskExecutor, event_tx: mpsc::Sender<Event>, max_delay_ms: u64) {
        if let Some(prev) = self.handle.take() {
            prev.abort();
        }
        let delay_ms = rand::thread_rng().gen_range(1..=max_delay_ms.max(1));
        let handle = executor.spawn_async("rtxp_check_fee_timer", async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let _ = event_tx.send(Event::CheckFee).await;
        });
        self.handle = Some(handle);
    }

    pub fn disarm(&mut self) {
        if let Some(prev) = self.handle.take() {
            prev.abort();
        }
    }
}
