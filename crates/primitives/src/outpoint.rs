use std::fmt;

use bitcoin::OutPoint;
use serde::{Deserialize, Serialize};

/// A `(txid, vout)` pair uniquely identifying a transaction output.
///
/// Thin wrapper around [`bitcoin::OutPoint`] so the publisher/monitor crates
/// don't have to name the `bitcoin` crate directly at every call site.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct OutputRef(OutPoint);

impl OutputRef {
    pub fn new(txid: bitcoin::Txid, vout: u32) -> Self {
        Self(OutPoint::new(txid, vout))
    }

    pub fn txid(&self) -> bitcoin::Txid {
        self.0.txid
    }

    pub fn vout(&self) -> u32 {
        self.0.vout
    }

    pub fn outpoint(&self) -> OutPoint {
        self.0
    }
}

impl From<OutPoint> for OutputRef {
    fn from(value: OutPoint) -> Self {
        Self(value)
    }
}

impl From<OutputRef> for OutPoint {
    fn from(value: OutputRef) -> Self {
        value.0
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.txid, self.0.vout)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn display_matches_txid_vout() {
        let txid = bitcoin::Txid::from_str(&"11".repeat(32)).unwrap();
        let r = OutputRef::new(txid, 3);
        assert_eq!(r.vout(), 3);
        assert_eq!(format!("{r}"), format!("{txid}:3"));
    }
}
