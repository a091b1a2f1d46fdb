//! Currency formatting and parsing for [`Money`].
//!
//! Three output modes:
//! - full: symbol and fixed decimals (`₹1,234.50`, `₹1,234.00`)
//! - display: symbol, decimals only when fractional (`₹1,234.50`, `₹1,234`)
//! - plain: no symbol, no separators (`1234.50`), accepted back by [`CurrencyFormat::parse`]
//!
//! Formatting is pure integer arithmetic on the subunit count.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use super::money::{ArithmeticError, DEFAULT_DECIMAL_PLACES, Money};

/// Largest supported number of subunit digits.
pub const MAX_DECIMAL_PLACES: u32 = 9;

/// Symbols stripped by the parser in addition to the configured one.
const KNOWN_SYMBOLS: [&str; 8] = ["INR", "Rs.", "Rs", "₹", "$", "€", "£", "¥"];

/// Error returned when text cannot be read as a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was empty or whitespace.
    #[error("Amount is empty")]
    Empty,

    /// Input is not a decimal amount.
    #[error("Malformed amount: {input:?}")]
    Malformed {
        /// The rejected input.
        input: String,
    },

    /// Input is a valid number that does not fit in the subunit range.
    #[error("Amount is out of range: {input:?}")]
    OutOfRange {
        /// The rejected input.
        input: String,
    },
}

/// Error returned when a currency format is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Too many subunit digits.
    #[error("Decimal places must be at most {MAX_DECIMAL_PLACES}, got {0}")]
    TooManyDecimalPlaces(u32),

    /// Symbol contains characters the parser relies on.
    #[error("Currency symbol must not contain digits, signs or '.': {0:?}")]
    InvalidSymbol(String),

    /// Separator is not a single character, or clashes with number syntax.
    #[error("Thousands separator must be one character other than a digit, sign or '.': {0:?}")]
    InvalidSeparator(String),
}

/// How amounts of one currency are written and read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    symbol: String,
    decimal_places: u32,
    thousands_separator: char,
}

impl Default for CurrencyFormat {
    /// Indian rupee: `₹`, two decimals, `,` grouping.
    fn default() -> Self {
        Self {
            symbol: "₹".to_string(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
            thousands_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// Creates a validated format.
    pub fn new(
        symbol: impl Into<String>,
        decimal_places: u32,
        thousands_separator: char,
    ) -> Result<Self, FormatError> {
        let symbol = symbol.into();
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(FormatError::TooManyDecimalPlaces(decimal_places));
        }
        if symbol.chars().any(is_number_syntax) {
            return Err(FormatError::InvalidSymbol(symbol));
        }
        if is_number_syntax(thousands_separator)
            || (thousands_separator.is_whitespace() && thousands_separator != ' ')
        {
            return Err(FormatError::InvalidSeparator(
                thousands_separator.to_string(),
            ));
        }
        Ok(Self {
            symbol,
            decimal_places,
            thousands_separator,
        })
    }

    /// Currency symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of subunit digits.
    #[must_use]
    pub const fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Thousands separator.
    #[must_use]
    pub const fn thousands_separator(&self) -> char {
        self.thousands_separator
    }

    /// Converts a major-unit float using this format's subunit scale.
    pub fn from_major(&self, value: f64) -> Result<Money, ArithmeticError> {
        Money::from_major_scaled(value, self.decimal_places)
    }

    /// Symbol and fixed decimals.
    #[must_use]
    pub fn format_full(&self, money: Money) -> String {
        self.render(money, true, Some(self.symbol.as_str()), true)
    }

    /// Symbol; decimals only when the amount is not a whole number of major units.
    #[must_use]
    pub fn format_display(&self, money: Money) -> String {
        let fractional = money.subunits().unsigned_abs() % self.unit() != 0;
        self.render(money, true, Some(self.symbol.as_str()), fractional)
    }

    /// No symbol, no separators, fixed decimals.
    #[must_use]
    pub fn format_plain(&self, money: Money) -> String {
        self.render(money, false, None, true)
    }

    /// Parses an amount written in major units.
    ///
    /// Accepts surrounding whitespace, one sign (before or after the symbol),
    /// the configured symbol or a well-known one, thousands separators, and at
    /// most one decimal point. Extra fractional digits round half away from zero.
    pub fn parse(&self, input: &str) -> Result<Money, ParseError> {
        let malformed = || ParseError::Malformed {
            input: input.to_string(),
        };

        let text = input.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let (leading_negative, leading_sign, text) = split_sign(text);
        let text = self.strip_symbol(text.trim_start()).trim_start();
        let (inner_negative, inner_sign, text) = split_sign(text);
        if leading_sign && inner_sign {
            return Err(malformed());
        }
        let negative = leading_negative || inner_negative;

        let digits: String = text
            .chars()
            .filter(|c| *c != self.thousands_separator)
            .collect();
        let body = normalize_decimal(&digits).ok_or_else(malformed)?;

        let out_of_range = || ParseError::OutOfRange {
            input: input.to_string(),
        };
        let amount = Decimal::from_str(&body).map_err(|_| out_of_range())?;
        let amount = if negative { -amount } else { amount };
        Money::from_decimal(amount, self.decimal_places).map_err(|_| out_of_range())
    }

    fn unit(&self) -> u64 {
        10_u64.pow(self.decimal_places)
    }

    fn strip_symbol<'a>(&self, text: &'a str) -> &'a str {
        if !self.symbol.is_empty()
            && let Some(rest) = text.strip_prefix(self.symbol.as_str())
        {
            return rest;
        }
        KNOWN_SYMBOLS
            .iter()
            .find_map(|symbol| text.strip_prefix(*symbol))
            .unwrap_or(text)
    }

    fn render(&self, money: Money, grouped: bool, symbol: Option<&str>, decimals: bool) -> String {
        let magnitude = money.subunits().unsigned_abs();
        let whole = magnitude / self.unit();
        let fraction = magnitude % self.unit();

        let mut out = String::new();
        if money.is_negative() {
            out.push('-');
        }
        if let Some(symbol) = symbol {
            out.push_str(symbol);
        }
        if grouped {
            out.push_str(&self.group_thousands(whole));
        } else {
            out.push_str(&whole.to_string());
        }
        if decimals && self.decimal_places > 0 {
            out.push('.');
            out.push_str(&format!(
                "{fraction:0width$}",
                width = self.decimal_places as usize
            ));
        }
        out
    }

    fn group_thousands(&self, whole: u64) -> String {
        let digits = whole.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.thousands_separator);
            }
            out.push(ch);
        }
        out
    }
}

fn is_number_syntax(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
}

/// Returns `(negative, had_sign, rest)`.
fn split_sign(text: &str) -> (bool, bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, true, rest)
    } else {
        (false, false, text)
    }
}

/// Checks `digits[.digits]` syntax and fills in a missing integer or fraction part.
fn normalize_decimal(text: &str) -> Option<String> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !fraction.is_none_or(all_digits) {
        return None;
    }
    if whole.is_empty() && fraction.is_none_or(str::is_empty) {
        return None;
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    Some(match fraction {
        Some(fraction) if !fraction.is_empty() => format!("{whole}.{fraction}"),
        _ => whole.to_string(),
    })
}
