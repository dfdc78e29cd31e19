use thiserror::Error;

/// Fallible setup step for an MTM run. The steady-state loop itself is
/// total over `TxResult` and never returns an error; this only covers
/// failing to hand off the terminal result to a gone-away parent.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("result channel to parent publisher closed")]
    ParentGone,
}
