use rtxp_collaborators::{FundedTx, TxWithWitnessData};
use rtxp_primitives::Feerate;

/// Which broadcast attempt a tagged event belongs to. A lone attempt starts
/// out `Previous`; each successive replacement alternates to the other
/// value (see [`AttemptSlot::other`]) so that across repeated RBF rounds the
/// two attempts live in `Publishing` always carry distinct slots, never the
/// same one twice in a row.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AttemptSlot {
    Previous,
    Bumped,
}

impl AttemptSlot {
    /// The other slot value. Used to tag a freshly funded replacement so it
    /// never collides with the slot of the attempt it is replacing, however
    /// many RBF rounds deep that attempt's own slot came from.
    pub fn other(self) -> Self {
        match self {
            AttemptSlot::Previous => AttemptSlot::Bumped,
            AttemptSlot::Bumped => AttemptSlot::Previous,
        }
    }
}

/// A broadcast attempt RTxP currently owns: the funded transaction plus
/// which slot it occupies. Its live `TxResult`s arrive as slot-tagged
/// `Event::Mtm` messages; the attempt itself holds no channel.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub slot: AttemptSlot,
    pub funded: FundedTx,
}

pub enum State {
    CheckingPreconditions,
    CheckingTimeLocks { base: TxWithWitnessData },
    Funding { base: TxWithWitnessData },
    Waiting { attempt: Attempt },
    FundingReplacement {
        previous: Attempt,
        base: TxWithWitnessData,
        /// The feerate `decide_bump` already settled on; carried through
        /// rather than recomputed so the forced-floor case (`remaining <=
        /// 6`, market feerate below `r_prev * bump_ratio`) isn't lost.
        target_feerate: Feerate,
    },
    Publishing { previous: Attempt, bumped: Attempt },
    CleaningUp { survivor: Attempt, loser: Attempt },
    Stopping { outstanding: Vec<Attempt> },
    Stopped,
}
