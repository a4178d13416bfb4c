//! Pure mapping from a usage count to a response tier.

use parley_types::quota::{QuotaLimits, Tier};

/// Classify `count` against `limits`.
///
/// Checks run from the hard cap downward, so a threshold that coincides with
/// a higher one is shadowed by it.
pub fn classify(count: u32, limits: &QuotaLimits) -> Tier {
    if count >= limits.max_turns_per_month {
        Tier::Blocked
    } else if limits.exhausted_threshold.is_some_and(|t| count >= t) {
        Tier::Exhausted
    } else if limits.warning_threshold.is_some_and(|t| count >= t) {
        Tier::Warning
    } else {
        Tier::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_boundaries() {
        let limits = QuotaLimits::default();
        let cases = [
            (0, Tier::Normal),
            (14, Tier::Normal),
            (15, Tier::Warning),
            (24, Tier::Warning),
            (25, Tier::Exhausted),
            (29, Tier::Exhausted),
            (30, Tier::Blocked),
            (31, Tier::Blocked),
        ];
        for (count, expected) in cases {
            assert_eq!(classify(count, &limits), expected, "count = {count}");
        }
    }

    #[test]
    fn single_hard_cutoff() {
        let limits = QuotaLimits {
            max_turns_per_month: 10,
            warning_threshold: None,
            exhausted_threshold: None,
        };
        assert_eq!(classify(9, &limits), Tier::Normal);
        assert_eq!(classify(10, &limits), Tier::Blocked);
    }

    #[test]
    fn warning_only() {
        let limits = QuotaLimits {
            max_turns_per_month: 10,
            warning_threshold: Some(8),
            exhausted_threshold: None,
        };
        assert_eq!(classify(7, &limits), Tier::Normal);
        assert_eq!(classify(9, &limits), Tier::Warning);
        assert_eq!(classify(10, &limits), Tier::Blocked);
    }

    #[test]
    fn coinciding_thresholds_prefer_the_stricter_tier() {
        let limits = QuotaLimits {
            max_turns_per_month: 20,
            warning_threshold: Some(20),
            exhausted_threshold: Some(20),
        };
        assert_eq!(classify(19, &limits), Tier::Normal);
        assert_eq!(classify(20, &limits), Tier::Blocked);
    }

    #[test]
    fn zero_cap_blocks_everything() {
        let limits = QuotaLimits {
            max_turns_per_month: 0,
            warning_threshold: None,
            exhausted_threshold: None,
        };
        assert_eq!(classify(0, &limits), Tier::Blocked);
    }
}
