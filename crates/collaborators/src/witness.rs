/// Witness-construction info the funder needs to finish signing a claim,
/// keyed by which kind of pre-signed transaction this command is publishing.
#[derive(Debug, Clone)]
pub enum WitnessData {
    /// Claim of our own anchor output.
    LocalAnchor,
    /// Claim of the counterparty's anchor output.
    RemoteAnchor,
    /// HTLC-success claim; requires the payment preimage.
    HtlcSuccess { preimage: [u8; 32] },
    /// HTLC-timeout claim; spendable once the CLTV expiry has passed.
    HtlcTimeout,
    /// Generic HTLC claim shared by second-stage transactions, with an
    /// optional preimage when the path requires one.
    ClaimHtlc { preimage: Option<[u8; 32]> },
}
