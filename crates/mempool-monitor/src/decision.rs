use rtxp_collaborators::TxRejectedReason;

/// Maps the three concurrently-gathered facts about a claimed input to a
/// terminal rejection reason, per the input-status probe table.
pub fn classify_input_status(
    parent_confirmations: Option<u32>,
    spendable_excl_mempool: bool,
    spendable_incl_mempool: bool,
) -> TxRejectedReason {
    let (spent_confirmed, spent_unconfirmed) = match parent_confirmations {
        Some(0) => (false, !spendable_incl_mempool),
        Some(_) => (
            !spendable_excl_mempool,
            spendable_excl_mempool && !spendable_incl_mempool,
        ),
        None => (false, false),
    };

    if spent_confirmed {
        TxRejectedReason::ConflictingTxConfirmed
    } else if spent_unconfirmed {
        TxRejectedReason::ConflictingTxUnconfirmed
    } else {
        TxRejectedReason::WalletInputGone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_parent_confs_spent_in_mempool_only() {
        let reason = classify_input_status(Some(0), false, true);
        assert_eq!(reason, TxRejectedReason::ConflictingTxUnconfirmed);
    }

    #[test]
    fn zero_parent_confs_not_spent_anywhere() {
        let reason = classify_input_status(Some(0), false, false);
        assert_eq!(reason, TxRejectedReason::WalletInputGone);
    }

    #[test]
    fn confirmed_parent_spent_outside_mempool_view() {
        // spendable_excl=false means it IS spent when excluding mempool -> confirmed spend.
        let reason = classify_input_status(Some(3), false, false);
        assert_eq!(reason, TxRejectedReason::ConflictingTxConfirmed);
    }

    #[test]
    fn confirmed_parent_spent_only_in_mempool() {
        let reason = classify_input_status(Some(3), true, false);
        assert_eq!(reason, TxRejectedReason::ConflictingTxUnconfirmed);
    }

    #[test]
    fn confirmed_parent_still_spendable_everywhere() {
        let reason = classify_input_status(Some(3), true, true);
        assert_eq!(reason, TxRejectedReason::WalletInputGone);
    }

    #[test]
    fn no_parent_confirmations_known() {
        let reason = classify_input_status(None, true, true);
        assert_eq!(reason, TxRejectedReason::WalletInputGone);
    }
}
