use rtxp_collaborators::TxResult;

use crate::state::AttemptSlot;

/// Unified inbox message. External `Stop`, the `CheckFee` timer, and every
/// MTM status report funnel through the same channel so the actor loop has
/// a single point of suspension. Collaborator calls that produce exactly
/// one result (precondition check, time-lock wait, funding) aren't routed
/// through here: `EventStash::run_to_completion` awaits their future
/// directly while stashing anything that arrives on this channel meanwhile.
pub enum Event {
    Stop,
    CheckFee,
    Mtm(AttemptSlot, TxResult),
}
