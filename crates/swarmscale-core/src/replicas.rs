//! Replica target calculation.

/// Apply a signed delta to a replica count, flooring at zero.
///
/// Equivalent to `max(current + delta, 0)`. There is no upper bound; the
/// control plane decides whether a large count is acceptable. Saturates
/// rather than overflowing at the extremes of `u64`.
pub fn compute_target(current: u64, delta: i64) -> u64 {
    if delta >= 0 {
        current.saturating_add(delta.unsigned_abs())
    } else {
        current.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_floored_sum_over_range() {
        for current in 0..=20u64 {
            for delta in -30..=30i64 {
                let expected = (current as i64 + delta).max(0) as u64;
                assert_eq!(compute_target(current, delta), expected, "{current} {delta}");
            }
        }
    }

    #[test]
    fn zero_delta_keeps_current() {
        assert_eq!(compute_target(0, 0), 0);
        assert_eq!(compute_target(7, 0), 7);
    }

    #[test]
    fn scale_down_within_range() {
        assert_eq!(compute_target(4, -2), 2);
    }

    #[test]
    fn scale_down_floors_at_zero() {
        assert_eq!(compute_target(0, -5), 0);
        assert_eq!(compute_target(3, i64::MIN), 0);
    }

    #[test]
    fn scale_up_is_unbounded() {
        assert_eq!(compute_target(3, 10), 13);
        assert_eq!(compute_target(0, i64::MAX), i64::MAX as u64);
    }

    #[test]
    fn saturates_at_u64_max() {
        assert_eq!(compute_target(u64::MAX, 1), u64::MAX);
    }
}
