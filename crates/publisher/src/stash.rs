use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::event::Event;

/// Design-minimum bound from the concurrency model: incoming messages
/// during an atomic funding transition are buffered here, never dropped,
/// up to this many before the actor would itself be the bottleneck.
pub const STASH_CAPACITY: usize = 100;

/// Bounded FIFO of events not yet relevant to the current wait, replayed in
/// arrival order once that wait resolves.
pub struct EventStash {
    buf: VecDeque<Event>,
}

impl EventStash {
    pub fn new() -> Self {
        Self {
            buf: VecDeque::with_capacity(STASH_CAPACITY),
        }
    }

    fn push(&mut self, event: Event) {
        if self.buf.len() >= STASH_CAPACITY {
            tracing::warn!("event stash at capacity, dropping oldest event");
            self.buf.pop_front();
        }
        self.buf.push_back(event);
    }

    /// Pulls the next event: a previously stashed one first (preserving
    /// arrival order), otherwise the next to arrive on the channel.
    pub async fn next(&mut self, rx: &mut mpsc::Receiver<Event>) -> Option<Event> {
        if let Some(event) = self.buf.pop_front() {
            return Some(event);
        }
        rx.recv().await
    }

    pub fn push_back(&mut self, event: Event) {
        self.push(event);
    }

    /// Removes and reports a stashed `Stop`, if one is already waiting,
    /// without blocking. Used before starting a new atomic wait so a Stop
    /// that arrived during the previous one is acted on promptly.
    pub fn take_stop(&mut self) -> bool {
        if let Some(pos) = self.buf.iter().position(|e| matches!(e, Event::Stop)) {
            self.buf.remove(pos);
            true
        } else {
            false
        }
    }

    /// Races a future against the event channel: on completion, returns its
    /// value; any event that arrives first (including further events after
    /// the first) is stashed for replay, exactly mirroring the
    /// Funding/FundingReplacement atomicity discipline.
    pub async fn run_to_completion<T, F>(&mut self, rx: &mut mpsc::Receiver<Event>, fut: F) -> Option<T>
    where
        F: std::future::Future<Output = T>,
    {
        tokio::pin!(fut);
        loop {
            tokio::select! {
                value = &mut fut => return Some(value),
                event = rx.recv() => {
                    match event {
                        Some(event) => self.push(event),
                        None => return None,
                    }
                }
            }
        }
    }
}
