use rtxp_primitives::Feerate;

/// Bump decision for `Waiting` on `CheckFee(h)`, per the target-feerate
/// policy: `remaining = confirm_before - h`.
///
/// Returns the feerate to bump to, or `None` if no bump is warranted. In
/// every `Some` case the result is at least `r_prev * bump_ratio`, which is
/// what guarantees the "monotone bump" invariant holds structurally rather
/// than by a separate runtime check.
pub fn decide_bump(remaining: i64, r_prev: Feerate, r_curr: Feerate, bump_ratio: f64) -> Option<Feerate> {
    let forced_floor = r_prev.scale(bump_ratio);
    if remaining <= 6 {
        Some(r_curr.max(forced_floor))
    } else if forced_floor <= r_curr {
        Some(r_curr)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bump_when_market_flat_and_deadline_far() {
        // S1: confirm_before=1000, current_height=900, feerate constant.
        let prev = Feerate::from_sat_per_kw(10);
        let curr = Feerate::from_sat_per_kw(10);
        assert_eq!(decide_bump(100, prev, curr, 1.20), None);
    }

    #[test]
    fn forces_bump_near_deadline() {
        // S2: confirm_before=905, current_height=900, remaining=5 <= 6.
        let prev = Feerate::from_sat_per_kw(5);
        let curr = Feerate::from_sat_per_kw(8);
        assert_eq!(decide_bump(5, prev, curr, 1.20), Some(Feerate::from_sat_per_kw(8)));
    }

    #[test]
    fn bumps_when_market_moved_past_ratio() {
        let prev = Feerate::from_sat_per_kw(10);
        let curr = Feerate::from_sat_per_kw(13);
        assert_eq!(decide_bump(50, prev, curr, 1.20), Some(Feerate::from_sat_per_kw(13)));
    }

    #[test]
    fn no_bump_when_market_moved_but_below_ratio() {
        let prev = Feerate::from_sat_per_kw(10);
        let curr = Feerate::from_sat_per_kw(11);
        assert_eq!(decide_bump(50, prev, curr, 1.20), None);
    }
}
