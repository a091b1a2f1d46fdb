//! Property-based tests for the allocation engine.
//!
//! - Zero leakage (equal, percentage)
//! - Determinism under input reordering
//! - Equal-split spread of at most one subunit
//! - Exact-split rejection of unbalanced shares

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use splitledger_shared::types::{Money, decimal_from_f64};

use super::allocation::SplitEngine;
use super::error::AllocationError;

/// Strategy to generate non-negative totals (0.00 to 1,000,000.00).
fn non_negative_total() -> impl Strategy<Value = Money> {
    (0i64..100_000_000i64).prop_map(Money::from_subunits)
}

/// Strategy to generate totals of either sign, including extremes.
fn any_total() -> impl Strategy<Value = Money> {
    prop_oneof![
        (-100_000_000i64..100_000_000i64).prop_map(Money::from_subunits),
        any::<i64>().prop_map(Money::from_subunits),
    ]
}

/// Strategy to generate 1 to 30 unique participant identifiers.
fn participants() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9]{0,7}", 1..30)
        .prop_map(|set| set.into_iter().collect())
}

/// Strategy to generate weights with two decimals summing to exactly 100.
fn weights_summing_to_100() -> impl Strategy<Value = BTreeMap<String, f64>> {
    (participants(), prop::collection::vec(1u32..1_000, 30)).prop_map(|(names, raw)| {
        let raw = &raw[..names.len()];
        let total: u32 = raw.iter().sum();
        // basis points; the last participant absorbs the rounding
        let mut points: Vec<i64> = raw
            .iter()
            .map(|v| i64::from(*v) * 10_000 / i64::from(total))
            .collect();
        let assigned: i64 = points.iter().sum();
        if let Some(last) = points.last_mut() {
            *last += 10_000 - assigned;
        }
        names
            .into_iter()
            .zip(points)
            .map(|(name, bp)| (name, Decimal::new(bp, 2).to_f64().unwrap_or_default()))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // =========================================================================
    // Equal split
    // =========================================================================

    /// *For any* total and participant set, shares SHALL sum to the total.
    #[test]
    fn prop_equal_zero_leakage(total in any_total(), names in participants()) {
        let allocation = SplitEngine::equal(total, &names).unwrap();
        prop_assert_eq!(allocation.len(), names.len());
        prop_assert_eq!(allocation.shares().values().sum::<Money>(), total);
    }

    /// *For any* total, largest and smallest shares SHALL differ by at most 1.
    #[test]
    fn prop_equal_spread_at_most_one(total in any_total(), names in participants()) {
        let allocation = SplitEngine::equal(total, &names).unwrap();
        let max = allocation.shares().values().max().copied().unwrap();
        let min = allocation.shares().values().min().copied().unwrap();
        prop_assert!((max - min).subunits() <= 1, "spread {} .. {}", min, max);
    }

    /// *For any* ordering of the same participants, shares SHALL be identical.
    #[test]
    fn prop_equal_is_order_independent(
        total in any_total(),
        (names, shuffled) in participants().prop_flat_map(|names| {
            let shuffled = Just(names.clone()).prop_shuffle();
            (Just(names), shuffled)
        }),
    ) {
        let first = SplitEngine::equal(total, &names).unwrap();
        let second = SplitEngine::equal(total, &shuffled).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Extra subunits SHALL go to the lexically first participants.
    #[test]
    fn prop_equal_extras_go_to_first_sorted(
        total in non_negative_total(),
        names in participants(),
    ) {
        let allocation = SplitEngine::equal(total, &names).unwrap();
        let shares: Vec<Money> = allocation.iter().map(|(_, share)| share).collect();
        prop_assert!(shares.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    // =========================================================================
    // Percentage split
    // =========================================================================

    /// *For any* non-negative total and weights summing to 100, shares SHALL sum
    /// to the total.
    #[test]
    fn prop_percentage_zero_leakage(
        total in non_negative_total(),
        weights in weights_summing_to_100(),
    ) {
        let allocation = SplitEngine::percentage(total, &weights).unwrap();
        prop_assert_eq!(allocation.shares().values().sum::<Money>(), total);
    }

    /// *For any* weights summing to 100, each share SHALL be within one subunit
    /// above its floor.
    #[test]
    fn prop_percentage_shares_near_proportional(
        total in non_negative_total(),
        weights in weights_summing_to_100(),
    ) {
        let allocation = SplitEngine::percentage(total, &weights).unwrap();
        let amount = Decimal::from(total.subunits());
        for (participant, share) in allocation.iter() {
            let weight = decimal_from_f64(weights[participant]).unwrap();
            let floor = (amount * weight / Decimal::ONE_HUNDRED).floor().to_i64().unwrap();
            prop_assert!(share.subunits() >= floor && share.subunits() <= floor + 1);
        }
    }

    /// *For any* insertion order of the same weights, shares SHALL be identical.
    #[test]
    fn prop_percentage_is_deterministic(
        total in non_negative_total(),
        weights in weights_summing_to_100(),
    ) {
        let reversed: BTreeMap<String, f64> = weights
            .iter()
            .rev()
            .map(|(participant, weight)| (participant.clone(), *weight))
            .collect();
        let first = SplitEngine::percentage(total, &weights).unwrap();
        let second = SplitEngine::percentage(total, &reversed).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every result with total >= 0 and weights within tolerance SHALL balance.
    #[test]
    fn prop_percentage_balanced_within_tolerance(
        total in non_negative_total(),
        a in 0u32..=10_000,
        drift in -1i64..=1,
    ) {
        // two participants, weights sum to 100 +/- 0.01
        let first = Decimal::new(i64::from(a), 2);
        let second = Decimal::new(10_000 - i64::from(a) + drift, 2);
        let weights = BTreeMap::from([
            ("a".to_string(), first.to_f64().unwrap()),
            ("b".to_string(), second.to_f64().unwrap()),
        ]);
        match SplitEngine::percentage(total, &weights) {
            Ok(allocation) => prop_assert!(allocation.is_balanced()),
            // b goes negative when a = 100.00 and drift = -1
            Err(AllocationError::InvalidPercentage { .. }) => prop_assert!(second < Decimal::ZERO),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    // =========================================================================
    // Exact split
    // =========================================================================

    /// *For any* shares whose sum differs from the total, exact split SHALL fail.
    #[test]
    fn prop_exact_rejects_unbalanced(
        amounts in prop::collection::vec(-1_000_000i64..1_000_000, 1..20),
        offset in prop_oneof![-1_000i64..0, 1i64..1_000],
    ) {
        let shares: BTreeMap<String, Money> = amounts
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("p{i:02}"), Money::from_subunits(*s)))
            .collect();
        let sum: i64 = amounts.iter().sum();
        let total = Money::from_subunits(sum + offset);

        let err = SplitEngine::exact(total, shares).unwrap_err();
        prop_assert!(err.is_invalid_argument());
        let is_mismatch = matches!(err, AllocationError::SharesMismatch { .. });
        prop_assert!(is_mismatch);
    }

    /// *For any* shares, exact split with their own sum SHALL succeed unchanged.
    #[test]
    fn prop_exact_accepts_balanced(
        amounts in prop::collection::vec(-1_000_000i64..1_000_000, 1..20),
    ) {
        let shares: BTreeMap<String, Money> = amounts
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("p{i:02}"), Money::from_subunits(*s)))
            .collect();
        let total: Money = shares.values().sum();

        let allocation = SplitEngine::exact(total, shares.clone()).unwrap();
        prop_assert_eq!(allocation.shares(), &shares);
    }
}
