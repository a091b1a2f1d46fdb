//! Request and result types for the allocation engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use splitledger_shared::types::Money;

/// Allocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Everyone pays the same, up to one subunit.
    Equal,
    /// Caller states every share.
    Exact,
    /// Shares proportional to percentage weights.
    Percentage,
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Exact => write!(f, "exact"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

/// Strategy-specific request data.
///
/// Serialized with a `method` tag, e.g.
/// `{"method":"exact","shares":{"a":6000,"b":4000}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum SplitRequest {
    /// Split evenly between unique participants.
    Equal {
        /// Participant identifiers, in any order.
        participants: Vec<String>,
    },
    /// Use the given shares as-is.
    Exact {
        /// Participant to share, in subunits when serialized.
        #[serde(with = "subunit_map")]
        shares: BTreeMap<String, Money>,
    },
    /// Split by percentage weights summing to 100.
    Percentage {
        /// Participant to percentage weight.
        weights: BTreeMap<String, f64>,
    },
}

impl SplitRequest {
    /// Strategy this request selects.
    #[must_use]
    pub const fn method(&self) -> SplitMethod {
        match self {
            Self::Equal { .. } => SplitMethod::Equal,
            Self::Exact { .. } => SplitMethod::Exact,
            Self::Percentage { .. } => SplitMethod::Percentage,
        }
    }
}

/// A total amount plus how to divide it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Amount to divide.
    pub total: Money,
    /// Strategy and its data.
    #[serde(flatten)]
    pub split: SplitRequest,
}

impl AllocationRequest {
    /// Equal split request.
    pub fn equal<I, S>(total: Money, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            total,
            split: SplitRequest::Equal {
                participants: participants.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Exact split request.
    pub fn exact<I, S>(total: Money, shares: I) -> Self
    where
        I: IntoIterator<Item = (S, Money)>,
        S: Into<String>,
    {
        Self {
            total,
            split: SplitRequest::Exact {
                shares: shares.into_iter().map(|(p, m)| (p.into(), m)).collect(),
            },
        }
    }

    /// Percentage split request.
    pub fn percentage<I, S>(total: Money, weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            total,
            split: SplitRequest::Percentage {
                weights: weights.into_iter().map(|(p, w)| (p.into(), w)).collect(),
            },
        }
    }

    /// Strategy this request selects.
    #[must_use]
    pub const fn method(&self) -> SplitMethod {
        self.split.method()
    }
}

/// Outcome of a successful allocation.
///
/// Shares are keyed and iterated in lexical participant order. Every value
/// produced by the engine satisfies `sum(shares) == total`; values read back
/// from storage can be re-checked with [`Allocation::is_balanced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    method: SplitMethod,
    total: Money,
    #[serde(with = "subunit_map")]
    shares: BTreeMap<String, Money>,
}

impl Allocation {
    pub(crate) const fn new(
        method: SplitMethod,
        total: Money,
        shares: BTreeMap<String, Money>,
    ) -> Self {
        Self {
            method,
            total,
            shares,
        }
    }

    /// Strategy that produced the shares.
    #[must_use]
    pub const fn method(&self) -> SplitMethod {
        self.method
    }

    /// Amount that was divided.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }

    /// Participant to share.
    #[must_use]
    pub const fn shares(&self) -> &BTreeMap<String, Money> {
        &self.shares
    }

    /// Share of one participant, if present.
    #[must_use]
    pub fn share_of(&self, participant: &str) -> Option<Money> {
        self.shares.get(participant).copied()
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// True when there are no shares (never the case for engine output).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Iterates `(participant, share)` in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.shares.iter().map(|(p, m)| (p.as_str(), *m))
    }

    /// Consumes the allocation, returning the share map.
    #[must_use]
    pub fn into_shares(self) -> BTreeMap<String, Money> {
        self.shares
    }

    /// True when the shares sum exactly to the total.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        super::validation::validate_allocation(self.total, self.shares.values())
    }
}

/// Serializes a share map as participant to integer subunits.
mod subunit_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};
    use splitledger_shared::types::Money;

    pub fn serialize<S>(shares: &BTreeMap<String, Money>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(shares.iter().map(|(p, m)| (p, m.subunits())))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Money>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, i64>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(p, subunits)| (p, Money::from_subunits(subunits)))
            .collect())
    }
}
