use std::fmt;

use serde::{Deserialize, Serialize};

/// A feerate expressed in satoshis per kilo-weight-unit, matching the unit
/// Bitcoin Core's fee estimator and `bitcoin::Weight`-based fee math use.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Feerate(u64);

impl Feerate {
    pub const fn from_sat_per_kw(sat_per_kw: u64) -> Self {
        Self(sat_per_kw)
    }

    pub const fn sat_per_kw(&self) -> u64 {
        self.0
    }

    /// Scales the feerate by a ratio, rounding up so a bump never rounds down
    /// below the required BIP-125 minimum.
    pub fn scale(&self, ratio: f64) -> Self {
        let scaled = (self.0 as f64 * ratio).ceil() as u64;
        Self(scaled)
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Fee, in satoshis, for a transaction of the given virtual size.
    pub fn fee_for_vsize(&self, vsize_vbytes: u64) -> u64 {
        // sat/kw -> sat/vbyte is sat/kw * 4 / 1000, vsize already in vbytes.
        (self.0 * vsize_vbytes * 4).div_ceil(1000)
    }
}

impl fmt::Display for Feerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sat/kw", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rounds_up() {
        let r = Feerate::from_sat_per_kw(5);
        assert_eq!(r.scale(1.20).sat_per_kw(), 6);
    }

    #[test]
    fn max_picks_larger() {
        let a = Feerate::from_sat_per_kw(8);
        let b = Feerate::from_sat_per_kw(6);
        assert_eq!(a.max(b), a);
        assert_eq!(b.max(a), a);
    }
}
