//! Allocation strategies with deterministic remainder distribution.
//!
//! All strategies work on integer subunits. Leftover subunits are handed out
//! one at a time in lexical order of participant identifier (byte order of the
//! UTF-8 string), so the same participant set always yields the same shares
//! regardless of input order:
//!
//! 1. Compute a base share per participant, rounded down
//! 2. Remainder = total - sum of base shares
//! 3. Sort participants lexically
//! 4. Give +1 subunit to each of the first `remainder` participants

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use splitledger_shared::types::{Money, decimal_from_f64};
use tracing::debug;

use super::error::AllocationError;
use super::types::{Allocation, SplitMethod};
use super::validation::{ensure_balanced, wide_sum};

/// Allowed distance of the weight sum from 100.
const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Pure allocation engine.
///
/// Guarantees for every `Ok` result:
/// - Sum of shares EXACTLY equals the total
/// - Output depends only on the inputs, never on their order
pub struct SplitEngine;

impl SplitEngine {
    /// Split `total` evenly between unique participants.
    ///
    /// Uses floor division, so for any total (negative included) the
    /// remainder is in `0..K` and shares differ by at most one subunit.
    ///
    /// # Example
    ///
    /// ```
    /// use splitledger_core::split::SplitEngine;
    /// use splitledger_shared::Money;
    ///
    /// let total = Money::from_subunits(10_000);
    /// let allocation = SplitEngine::equal(total, &["c", "a", "b"]).unwrap();
    /// assert_eq!(allocation.share_of("a"), Some(Money::from_subunits(3_334)));
    /// assert_eq!(allocation.share_of("b"), Some(Money::from_subunits(3_333)));
    /// assert_eq!(allocation.share_of("c"), Some(Money::from_subunits(3_333)));
    /// ```
    pub fn equal<S>(total: Money, participants: &[S]) -> Result<Allocation, AllocationError>
    where
        S: AsRef<str>,
    {
        let ranked = rank_participants(participants.iter().map(|p| p.as_ref()))?;
        let count = i64::try_from(ranked.len()).map_err(|_| AllocationError::Overflow)?;

        let base = total.subunits().div_euclid(count);
        let remainder = total.subunits().rem_euclid(count);
        debug!(
            total = total.subunits(),
            participants = count,
            base,
            remainder,
            "Equal split"
        );

        let shares = distribute(&ranked, &vec![base; ranked.len()], remainder)?;
        finish(SplitMethod::Equal, total, shares)
    }

    /// Accept caller-provided shares that sum exactly to `total`.
    ///
    /// The shares are returned unchanged.
    pub fn exact(
        total: Money,
        shares: BTreeMap<String, Money>,
    ) -> Result<Allocation, AllocationError> {
        if shares.is_empty() {
            return Err(AllocationError::NoParticipants);
        }
        if shares.keys().any(|p| is_blank(p)) {
            return Err(AllocationError::InvalidParticipant);
        }

        let sum = wide_sum(shares.values().copied());
        if sum != i128::from(total.subunits()) {
            let sum = i64::try_from(sum).map_err(|_| AllocationError::Overflow)?;
            return Err(AllocationError::SharesMismatch {
                sum: Money::from_subunits(sum),
                total,
            });
        }
        debug!(
            total = total.subunits(),
            participants = shares.len(),
            "Exact split"
        );

        finish(SplitMethod::Exact, total, shares)
    }

    /// Split `total` by percentage weights.
    ///
    /// Base share is `floor(total * weight / 100)`, computed in decimal so
    /// that `33.33%` of `10000` is exactly `3333`. The remainder is spread in
    /// lexical order like [`SplitEngine::equal`]. When the weights miss 100 by
    /// up to the tolerance the remainder can be larger than the participant
    /// count, or negative; it then wraps around the ranking.
    ///
    /// # Example
    ///
    /// ```
    /// use splitledger_core::split::SplitEngine;
    /// use splitledger_shared::Money;
    /// use std::collections::BTreeMap;
    ///
    /// let weights = BTreeMap::from([
    ///     ("x".to_string(), 33.33),
    ///     ("y".to_string(), 33.33),
    ///     ("z".to_string(), 33.34),
    /// ]);
    /// let allocation = SplitEngine::percentage(Money::from_subunits(10_000), &weights).unwrap();
    /// assert_eq!(allocation.share_of("z"), Some(Money::from_subunits(3_334)));
    /// ```
    pub fn percentage(
        total: Money,
        weights: &BTreeMap<String, f64>,
    ) -> Result<Allocation, AllocationError> {
        if weights.is_empty() {
            return Err(AllocationError::NoParticipants);
        }

        let mut ranked = Vec::with_capacity(weights.len());
        let mut percents = Vec::with_capacity(weights.len());
        // BTreeMap iterates in lexical key order
        for (participant, &weight) in weights {
            if is_blank(participant) {
                return Err(AllocationError::InvalidParticipant);
            }
            let invalid = || AllocationError::InvalidPercentage {
                participant: participant.clone(),
                weight,
            };
            if weight < 0.0 {
                return Err(invalid());
            }
            ranked.push(participant.as_str());
            percents.push(decimal_from_f64(weight).map_err(|_| invalid())?);
        }

        // saturates far above 100, so an oversized sum is still a mismatch
        let sum = percents
            .iter()
            .fold(Decimal::ZERO, |acc, p| acc.saturating_add(*p));
        if (sum - HUNDRED).abs() > PERCENTAGE_TOLERANCE {
            return Err(AllocationError::PercentageSumMismatch { sum });
        }

        let amount = Decimal::from(total.subunits());
        let base = percents
            .iter()
            .map(|percent| {
                amount
                    .checked_mul(*percent)
                    .and_then(|scaled| scaled.checked_div(HUNDRED))
                    .and_then(|share| share.floor().to_i64())
                    .ok_or(AllocationError::Overflow)
            })
            .collect::<Result<Vec<i64>, _>>()?;

        let allocated = base
            .iter()
            .try_fold(0i64, |acc, share| acc.checked_add(*share))
            .ok_or(AllocationError::Overflow)?;
        let remainder = total
            .subunits()
            .checked_sub(allocated)
            .ok_or(AllocationError::Overflow)?;
        debug!(
            total = total.subunits(),
            participants = ranked.len(),
            %sum,
            remainder,
            "Percentage split"
        );

        let shares = distribute(&ranked, &base, remainder)?;
        finish(SplitMethod::Percentage, total, shares)
    }
}

fn is_blank(participant: &str) -> bool {
    participant.trim().is_empty()
}

/// Sorts identifiers lexically, rejecting empty sets, blanks, and duplicates.
fn rank_participants<'a, I>(participants: I) -> Result<Vec<&'a str>, AllocationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ranked: Vec<&str> = participants.into_iter().collect();
    if ranked.is_empty() {
        return Err(AllocationError::NoParticipants);
    }
    if ranked.iter().any(|p| is_blank(p)) {
        return Err(AllocationError::InvalidParticipant);
    }

    ranked.sort_unstable();
    if let Some(pair) = ranked.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(AllocationError::DuplicateParticipant(pair[0].to_string()));
    }
    Ok(ranked)
}

/// Adds `remainder` subunits to `base`, one per participant in ranked order.
///
/// A remainder outside `0..K` wraps: everyone first gets `remainder div K`,
/// then the first `remainder mod K` get one more (Euclidean, so also for
/// negative remainders).
fn distribute(
    ranked: &[&str],
    base: &[i64],
    remainder: i64,
) -> Result<BTreeMap<String, Money>, AllocationError> {
    let count = i64::try_from(ranked.len()).map_err(|_| AllocationError::Overflow)?;
    let per_participant = remainder.div_euclid(count);
    let extra = remainder.rem_euclid(count);

    ranked
        .iter()
        .zip(base)
        .zip(0i64..)
        .map(|((participant, share), rank)| {
            let bonus = i64::from(rank < extra);
            share
                .checked_add(per_participant)
                .and_then(|s| s.checked_add(bonus))
                .map(|s| ((*participant).to_string(), Money::from_subunits(s)))
                .ok_or(AllocationError::Overflow)
        })
        .collect()
}

fn finish(
    method: SplitMethod,
    total: Money,
    shares: BTreeMap<String, Money>,
) -> Result<Allocation, AllocationError> {
    ensure_balanced(total, &shares)?;
    Ok(Allocation::new(method, total, shares))
}
