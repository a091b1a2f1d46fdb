//! Allocation error types.
//!
//! Every rejected request is reported synchronously; the engine never returns
//! a partial or corrected allocation.

use rust_decimal::Decimal;
use splitledger_shared::AppError;
use splitledger_shared::types::Money;
use thiserror::Error;

/// Broad classification of an [`AllocationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed.
    InvalidArgument,
    /// Amounts are too large for the subunit range.
    Overflow,
    /// The engine broke its own post-condition.
    Internal,
}

/// Errors that can occur while allocating a total.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    // ========== Invalid Arguments ==========
    /// No participants were given.
    #[error("At least one participant is required")]
    NoParticipants,

    /// An equal split named the same participant twice.
    #[error("Participant {0:?} appears more than once")]
    DuplicateParticipant(String),

    /// A participant identifier is empty or whitespace.
    #[error("Participant identifier must not be blank")]
    InvalidParticipant,

    /// Exact shares do not add up to the total.
    #[error("Shares sum to {sum} but the total is {total}")]
    SharesMismatch {
        /// Sum of the given shares.
        sum: Money,
        /// Amount being divided.
        total: Money,
    },

    /// Percentage weights are not 100 within 0.01.
    #[error("Percentages must sum to 100 (±0.01), got {sum}")]
    PercentageSumMismatch {
        /// Sum of the given weights.
        sum: Decimal,
    },

    /// A weight is negative, NaN, or infinite.
    #[error("Percentage for {participant:?} must be a finite, non-negative number, got {weight}")]
    InvalidPercentage {
        /// Participant the weight belongs to.
        participant: String,
        /// The rejected weight.
        weight: f64,
    },

    // ========== Range Errors ==========
    /// An intermediate sum or share left the subunit range.
    #[error("Allocation exceeds the representable amount range")]
    Overflow,

    // ========== Internal Errors ==========
    /// Computed shares do not sum to the total.
    #[error("Allocation leaked money: shares sum to {sum}, total is {total}")]
    LeakageDetected {
        /// Sum of the computed shares.
        sum: Money,
        /// Amount being divided.
        total: Money,
    },
}

impl AllocationError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoParticipants
            | Self::DuplicateParticipant(_)
            | Self::InvalidParticipant
            | Self::SharesMismatch { .. }
            | Self::PercentageSumMismatch { .. }
            | Self::InvalidPercentage { .. } => ErrorKind::InvalidArgument,
            Self::Overflow => ErrorKind::Overflow,
            Self::LeakageDetected { .. } => ErrorKind::Internal,
        }
    }

    /// Returns true for malformed requests.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument)
    }

    /// Returns the error code for machine-readable output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::InvalidParticipant => "INVALID_PARTICIPANT",
            Self::SharesMismatch { .. } => "SHARES_MISMATCH",
            Self::PercentageSumMismatch { .. } => "PERCENTAGE_SUM_MISMATCH",
            Self::InvalidPercentage { .. } => "INVALID_PERCENTAGE",
            Self::Overflow => "AMOUNT_OVERFLOW",
            Self::LeakageDetected { .. } => "LEAKAGE_DETECTED",
        }
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err.kind() {
            ErrorKind::InvalidArgument | ErrorKind::Overflow => Self::Validation(err.to_string()),
            ErrorKind::Internal => Self::Internal(err.to_string()),
        }
    }
}
