/// Outcome of inspecting a `publish_transaction` error message.
///
/// Bitcoin Core doesn't give structured error codes here, only
/// human-readable text; substring matching is fragile but required for
/// compatibility, so it's isolated into this single function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorClass {
    /// `"rejecting replacement"` — a competing unconfirmed transaction won.
    ConflictingTxUnconfirmed,
    /// `"bad-txns-inputs-missingorspent"` — the claimed input may be spent
    /// by a confirmed transaction, spent unconfirmed, or simply gone.
    /// Requires an input-status probe to disambiguate.
    NeedsInputProbe,
    /// No recognized pattern.
    Unknown,
}

pub fn classify_publish_error(msg: &str) -> PublishErrorClass {
    if msg.contains("rejecting replacement") {
        PublishErrorClass::ConflictingTxUnconfirmed
    } else if msg.contains("bad-txns-inputs-missingorspent") {
        PublishErrorClass::NeedsInputProbe
    } else {
        PublishErrorClass::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_replacement_rejection() {
        assert_eq!(
            classify_publish_error("txn-mempool-conflict, rejecting replacement"),
            PublishErrorClass::ConflictingTxUnconfirmed
        );
    }

    #[test]
    fn matches_missing_or_spent_inputs() {
        assert_eq!(
            classify_publish_error("bad-txns-inputs-missingorspent"),
            PublishErrorClass::NeedsInputProbe
        );
    }

    #[test]
    fn falls_back_to_unknown() {
        assert_eq!(
            classify_publish_error("some other bitcoind error"),
            PublishErrorClass::Unknown
        );
    }
}
