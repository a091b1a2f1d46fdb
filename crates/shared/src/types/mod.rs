//! Common types used across the application.

pub mod format;
pub mod money;

#[cfg(test)]
mod props;

pub use format::{CurrencyFormat, FormatError, MAX_DECIMAL_PLACES, ParseError};
pub use money::{ArithmeticError, DEFAULT_DECIMAL_PLACES, Money, decimal_from_f64};
