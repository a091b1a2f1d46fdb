//! Money type backed by an integer count of currency subunits.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Floating inputs (major-unit amounts, scalar factors) are converted to
//! `rust_decimal::Decimal` and rounded back to whole subunits immediately,
//! using round-half-away-from-zero everywhere.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::format::{CurrencyFormat, ParseError};

/// Number of decimal places of the default currency (1/100 subunits).
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Represents a monetary amount as a signed count of the smallest currency subunit.
///
/// Equality, ordering, and hashing are defined solely by the subunit count.
/// Serializes as `{"subunits": <integer>}`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money {
    subunits: i64,
}

/// Errors from arithmetic that involves a floating-point factor or can overflow.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ArithmeticError {
    /// Factor was NaN or infinite.
    #[error("Scalar factor must be finite, got {0}")]
    NonFiniteFactor(f64),

    /// Divisor was zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Result does not fit in the subunit range.
    #[error("Amount exceeds the representable range")]
    Overflow,
}

impl Money {
    /// Zero in any currency.
    pub const ZERO: Self = Self { subunits: 0 };

    /// Creates an amount from an exact subunit count.
    #[must_use]
    pub const fn from_subunits(subunits: i64) -> Self {
        Self { subunits }
    }

    /// Returns the subunit count.
    #[must_use]
    pub const fn subunits(self) -> i64 {
        self.subunits
    }

    /// Creates an amount from a major-unit value in the default currency.
    ///
    /// `12.345` becomes 1235 subunits (half away from zero).
    pub fn from_major(value: f64) -> Result<Self, ArithmeticError> {
        Self::from_major_scaled(value, DEFAULT_DECIMAL_PLACES)
    }

    /// Creates an amount from a major-unit value with `decimal_places` subunit digits.
    pub fn from_major_scaled(value: f64, decimal_places: u32) -> Result<Self, ArithmeticError> {
        Self::from_decimal(decimal_from_f64(value)?, decimal_places)
    }

    /// Creates an amount from an exact decimal major-unit value.
    pub fn from_decimal(amount: Decimal, decimal_places: u32) -> Result<Self, ArithmeticError> {
        let unit = 10_i64
            .checked_pow(decimal_places)
            .ok_or(ArithmeticError::Overflow)?;
        let scaled = amount
            .checked_mul(Decimal::from(unit))
            .ok_or(ArithmeticError::Overflow)?;
        round_to_subunits(scaled)
    }

    /// Returns the amount in major units as an exact decimal.
    pub fn to_decimal(self, decimal_places: u32) -> Result<Decimal, ArithmeticError> {
        Decimal::try_new(self.subunits, decimal_places).map_err(|_| ArithmeticError::Overflow)
    }

    /// Parses text in the default currency format. See [`CurrencyFormat::parse`].
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        CurrencyFormat::default().parse(input)
    }

    /// Symbol and fixed decimals, e.g. `₹1,234.50`.
    #[must_use]
    pub fn format_full(self) -> String {
        CurrencyFormat::default().format_full(self)
    }

    /// Symbol, decimals only when fractional, e.g. `₹1,234` or `₹1,234.50`.
    #[must_use]
    pub fn format_display(self) -> String {
        CurrencyFormat::default().format_display(self)
    }

    /// Symbol-free text accepted back by [`Money::parse`], e.g. `1234.50`.
    #[must_use]
    pub fn format_plain(self) -> String {
        CurrencyFormat::default().format_plain(self)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.subunits == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.subunits < 0
    }

    /// Returns true if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.subunits > 0
    }

    /// Absolute value.
    ///
    /// # Panics
    ///
    /// Panics on `i64::MIN` subunits when overflow checks are enabled. Use
    /// [`Money::checked_abs`] to handle that case.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self::from_subunits(self.subunits.abs())
    }

    /// Absolute value, `None` for `i64::MIN` subunits.
    #[must_use]
    pub const fn checked_abs(self) -> Option<Self> {
        match self.subunits.checked_abs() {
            Some(subunits) => Some(Self::from_subunits(subunits)),
            None => None,
        }
    }

    /// Negation, `None` for `i64::MIN` subunits.
    #[must_use]
    pub const fn checked_neg(self) -> Option<Self> {
        match self.subunits.checked_neg() {
            Some(subunits) => Some(Self::from_subunits(subunits)),
            None => None,
        }
    }

    /// Addition that reports overflow instead of panicking.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.subunits.checked_add(rhs.subunits) {
            Some(subunits) => Some(Self::from_subunits(subunits)),
            None => None,
        }
    }

    /// Subtraction that reports overflow instead of panicking.
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.subunits.checked_sub(rhs.subunits) {
            Some(subunits) => Some(Self::from_subunits(subunits)),
            None => None,
        }
    }

    /// Sums a sequence, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Multiplies by a floating factor, rounding half away from zero.
    pub fn multiply(self, factor: f64) -> Result<Self, ArithmeticError> {
        let factor = decimal_from_f64(factor)?;
        let product = Decimal::from(self.subunits)
            .checked_mul(factor)
            .ok_or(ArithmeticError::Overflow)?;
        round_to_subunits(product)
    }

    /// Divides by a floating factor, rounding half away from zero.
    pub fn divide(self, divisor: f64) -> Result<Self, ArithmeticError> {
        let divisor = decimal_from_f64(divisor)?;
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let quotient = Decimal::from(self.subunits)
            .checked_div(divisor)
            .ok_or(ArithmeticError::Overflow)?;
        round_to_subunits(quotient)
    }
}

/// Converts a float to `Decimal` using its shortest round-trip representation.
///
/// `33.33_f64` becomes exactly `33.33`, not the nearest binary fraction.
pub fn decimal_from_f64(value: f64) -> Result<Decimal, ArithmeticError> {
    if !value.is_finite() {
        return Err(ArithmeticError::NonFiniteFactor(value));
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .ok_or(ArithmeticError::Overflow)
}

fn round_to_subunits(value: Decimal) -> Result<Money, ArithmeticError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money::from_subunits)
        .ok_or(ArithmeticError::Overflow)
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_subunits(self.subunits + rhs.subunits)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_subunits(self.subunits - rhs.subunits)
    }
}

/// # Panics
///
/// Panics on `i64::MIN` subunits when overflow checks are enabled. Use
/// [`Money::checked_neg`] to handle that case.
impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_subunits(-self.subunits)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_full())
    }
}

impl FromStr for Money {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
