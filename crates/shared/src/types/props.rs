//! Property-based tests for money parsing and formatting.

use proptest::prelude::*;

use super::format::CurrencyFormat;
use super::money::Money;

/// Any subunit count, biased toward ordinary amounts.
fn any_money() -> impl Strategy<Value = Money> {
    prop_oneof![
        (-100_000_000i64..100_000_000i64).prop_map(Money::from_subunits),
        any::<i64>().prop_map(Money::from_subunits),
    ]
}

/// Formats with 0 to 9 decimal places.
fn any_format() -> impl Strategy<Value = CurrencyFormat> {
    (0u32..=9, prop_oneof![Just(','), Just(' '), Just('\'')]).prop_map(|(places, sep)| {
        CurrencyFormat::new("₹", places, sep).expect("valid format")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// *For any* amount, parsing the plain format SHALL reproduce the subunit count.
    #[test]
    fn prop_plain_round_trip(money in any_money()) {
        let text = money.format_plain();
        prop_assert_eq!(Money::parse(&text).unwrap(), money, "round trip of {}", text);
    }

    /// *For any* amount and format, parsing the full format SHALL reproduce the amount.
    #[test]
    fn prop_full_round_trip_any_scale(money in any_money(), format in any_format()) {
        let plain = format.format_plain(money);
        prop_assert_eq!(format.parse(&plain).unwrap(), money);

        let full = format.format_full(money);
        prop_assert_eq!(format.parse(&full).unwrap(), money, "full text {}", full);
    }

    /// *For any* amount, display differs from full only by the omitted zero decimals.
    #[test]
    fn prop_display_is_full_without_zero_fraction(money in any_money()) {
        let full = money.format_full();
        let display = money.format_display();
        if money.subunits() % 100 == 0 {
            prop_assert_eq!(format!("{display}.00"), full);
        } else {
            prop_assert_eq!(display, full);
        }
    }
}
