//! Property-based tests for rate rounding and tier classification.
//!
//! Uses `proptest` to verify invariants across many random inputs.

use proptest::prelude::*;

use funnelwatch_cli::domain::{RunOutcome, Summary, Tier, TierThresholds, success_rate};

proptest! {
    /// The rate stays within 0..=100 and carries at most one decimal.
    #[test]
    fn prop_success_rate_is_bounded_and_rounded(total in 1u64..10_000, seed in any::<u64>()) {
        let passed = seed % (total + 1);
        let rate = success_rate(passed, total);
        prop_assert!((0.0..=100.0).contains(&rate), "out of range: {}", rate);
        let scaled = rate * 10.0;
        prop_assert!((scaled - scaled.round()).abs() < 1e-6, "more than one decimal: {}", rate);
    }

    /// A higher rate never lands in a lower tier.
    #[test]
    fn prop_tier_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let thresholds = TierThresholds::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(thresholds.classify(lo) <= thresholds.classify(hi));
    }

    /// Any failed probe makes the run degraded, whatever the tier.
    #[test]
    fn prop_any_failure_is_degraded(total in 1u64..1_000, failed in 1u64..1_000) {
        let failed = failed.min(total);
        let passed = total - failed;
        let rate = success_rate(passed, total);
        let summary = Summary {
            passed,
            total,
            failed,
            success_rate: rate,
            tier: TierThresholds::default().classify(rate),
        };
        prop_assert_eq!(RunOutcome::from_summary(&summary), RunOutcome::Degraded);
    }
}

#[test]
fn test_empty_total_is_zero_and_critical() {
    let rate = success_rate(0, 0);
    assert!(rate.abs() < f64::EPSILON);
    assert_eq!(TierThresholds::default().classify(rate), Tier::Critical);
}
