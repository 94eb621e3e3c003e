//! Property-based tests for the money converter.
//!
//! - Rounding idempotence: cents round-trip equals 2-decimal rounding
//! - Determinism and sign symmetry

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use super::converter::MoneyConverter;

/// Strategy for amounts with up to 6 decimals (-10,000,000 to 10,000,000).
fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000_000_000i64..10_000_000_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The cents round-trip rounds to the same value as `round(x, 2)`.
    #[test]
    fn prop_round_trip_matches_two_decimal_rounding(x in amount()) {
        let round_trip = MoneyConverter::from_minor_units(MoneyConverter::to_minor_units(x));
        let expected = x.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(round_trip, expected);
    }

    /// The round-trip never drifts by more than half a cent.
    #[test]
    fn prop_round_trip_within_half_cent(x in amount()) {
        let round_trip = MoneyConverter::round_to_cents(x);
        prop_assert!((round_trip - x).abs() <= Decimal::new(5, 3));
    }

    /// Conversion is a pure function.
    #[test]
    fn prop_conversion_is_deterministic(x in amount()) {
        prop_assert_eq!(
            MoneyConverter::to_minor_units(x),
            MoneyConverter::to_minor_units(x)
        );
    }

    /// Rounding half away from zero is symmetric around zero.
    #[test]
    fn prop_conversion_is_sign_symmetric(x in amount()) {
        prop_assert_eq!(
            MoneyConverter::to_minor_units(-x),
            -MoneyConverter::to_minor_units(x)
        );
    }

    /// Whole cents survive the round-trip unchanged.
    #[test]
    fn prop_cents_are_fixed_points(cents in -1_000_000_000_000i64..1_000_000_000_000i64) {
        prop_assert_eq!(
            MoneyConverter::to_minor_units(MoneyConverter::from_minor_units(cents)),
            cents
        );
    }
}
