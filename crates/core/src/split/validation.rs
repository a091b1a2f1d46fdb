//! Zero-leakage check for computed or stored allocations.

use std::collections::BTreeMap;

use splitledger_shared::types::Money;

use super::error::AllocationError;

/// Returns true iff the shares sum exactly to `total`.
///
/// The sum is taken in `i128`, so intermediate overflow never changes the
/// answer.
pub fn validate_allocation<'a, I>(total: Money, shares: I) -> bool
where
    I: IntoIterator<Item = &'a Money>,
{
    wide_sum(shares.into_iter().copied()) == i128::from(total.subunits())
}

/// Exact sum of subunits.
pub(crate) fn wide_sum<I>(shares: I) -> i128
where
    I: IntoIterator<Item = Money>,
{
    shares
        .into_iter()
        .map(|share| i128::from(share.subunits()))
        .sum()
}

/// Post-condition every strategy runs before returning.
///
/// # Errors
///
/// Returns [`AllocationError::LeakageDetected`] when the shares do not sum to
/// `total`, or [`AllocationError::Overflow`] when they miss it by a sum that
/// does not fit in [`Money`].
pub fn ensure_balanced(
    total: Money,
    shares: &BTreeMap<String, Money>,
) -> Result<(), AllocationError> {
    let sum = wide_sum(shares.values().copied());
    if sum == i128::from(total.subunits()) {
        return Ok(());
    }
    let sum = i64::try_from(sum).map_err(|_| AllocationError::Overflow)?;
    Err(AllocationError::LeakageDetected {
        sum: Money::from_subunits(sum),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares(entries: &[(&str, i64)]) -> BTreeMap<String, Money> {
        entries
            .iter()
            .map(|(p, s)| ((*p).to_string(), Money::from_subunits(*s)))
            .collect()
    }

    #[test]
    fn test_balanced_shares() {
        let shares = shares(&[("a", 3_334), ("b", 3_333), ("c", 3_333)]);
        assert!(validate_allocation(Money::from_subunits(10_000), shares.values()));
        assert!(ensure_balanced(Money::from_subunits(10_000), &shares).is_ok());
    }

    #[test]
    fn test_unbalanced_shares() {
        let shares = shares(&[("a", 6_000), ("b", 3_999)]);
        assert!(!validate_allocation(Money::from_subunits(10_000), shares.values()));
        assert_eq!(
            ensure_balanced(Money::from_subunits(10_000), &shares),
            Err(AllocationError::LeakageDetected {
                sum: Money::from_subunits(9_999),
                total: Money::from_subunits(10_000),
            })
        );
    }

    #[test]
    fn test_overflowing_sum_is_not_balanced() {
        let shares = shares(&[("a", i64::MAX), ("b", 1)]);
        assert!(!validate_allocation(Money::from_subunits(i64::MIN), shares.values()));
        assert_eq!(
            ensure_balanced(Money::from_subunits(i64::MIN), &shares),
            Err(AllocationError::Overflow)
        );
    }

    #[test]
    fn test_intermediate_overflow_still_balances() {
        // a + b overflows i64 before c brings it back
        let shares = shares(&[("a", i64::MAX), ("b", 1), ("c", -1)]);
        assert!(validate_allocation(Money::from_subunits(i64::MAX), shares.values()));
        assert!(ensure_balanced(Money::from_subunits(i64::MAX), &shares).is_ok());
    }

    #[test]
    fn test_validate_accepts_any_share_collection() {
        let amounts = vec![Money::from_subunits(-50), Money::from_subunits(150)];
        assert!(validate_allocation(Money::from_subunits(100), &amounts));
        assert!(validate_allocation(Money::ZERO, &[]));
    }
}
