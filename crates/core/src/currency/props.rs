//! Property-based tests for currency operations.
//!
//! - Allocation sum invariant
//! - Rate lookup consistency

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tripsplit_shared::types::Currency;

use super::allocation::AllocationUtil;
use super::exchange::ExchangeRate;
use super::rates::{RateLookupMethod, RateSource, RateTable};

/// Strategy to generate amounts in cents (-1,000,000.00 to 1,000,000.00).
fn total_cents() -> impl Strategy<Value = i64> {
    -100_000_000i64..100_000_000i64
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate non-negative weights with up to 2 decimals.
fn weights() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0i64..10_000).prop_map(|v| Decimal::new(v, 2)), 1..12)
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Allocation Sum Invariant
    // =========================================================================

    /// *For any* total and count, allocate_equal() SHALL return `count` parts
    /// summing exactly to the total.
    #[test]
    fn prop_allocate_equal_sum_invariant(
        total in total_cents(),
        count in 1usize..100,
    ) {
        let result = AllocationUtil::allocate_equal(total, count);
        prop_assert_eq!(result.len(), count);
        prop_assert_eq!(result.iter().sum::<i64>(), total);
    }

    /// Equal parts differ by at most one cent.
    #[test]
    fn prop_allocate_equal_is_fair(
        total in total_cents(),
        count in 1usize..100,
    ) {
        let result = AllocationUtil::allocate_equal(total, count);
        let max = result.iter().copied().max().unwrap_or(0);
        let min = result.iter().copied().min().unwrap_or(0);
        prop_assert!(max - min <= 1, "Spread {} too large", max - min);
    }

    /// *For any* weights with a positive sum, allocations SHALL sum to the
    /// total and each SHALL be within one cent of its exact share.
    #[test]
    fn prop_allocate_by_weights_sum_invariant(
        total in total_cents(),
        weights in weights(),
    ) {
        let weight_sum: Decimal = weights.iter().copied().sum();
        prop_assume!(weight_sum > Decimal::ZERO);

        let result = AllocationUtil::allocate_by_weights(total, &weights);
        prop_assert_eq!(result.len(), weights.len());
        prop_assert_eq!(result.iter().sum::<i64>(), total);

        for (alloc, weight) in result.iter().zip(&weights) {
            let exact = Decimal::from(total) * *weight / weight_sum;
            let diff = (Decimal::from(*alloc) - exact).abs();
            prop_assert!(diff < Decimal::ONE, "Allocation {} too far from {}", alloc, exact);
        }
    }

    // =========================================================================
    // Rate lookup consistency
    // =========================================================================

    /// A stored pair is found directly and its reverse through inversion.
    #[test]
    fn prop_direct_and_inverse_lookup(rate in positive_rate()) {
        let table = RateTable::from_rates(
            Currency::USD,
            [ExchangeRate {
                from_currency: Currency::EUR,
                to_currency: Currency::USD,
                rate,
                effective_date: day(),
            }],
        );
        prop_assert!(table.is_ok());
        let table = table.unwrap_or_default();

        let direct = table.find_rate(Currency::EUR, Currency::USD, day());
        prop_assert_eq!(direct.map(|q| (q.rate, q.method)), Ok((rate, RateLookupMethod::Direct)));

        let inverse = table.find_rate(Currency::USD, Currency::EUR, day());
        prop_assert_eq!(
            inverse.map(|q| (q.rate, q.method)),
            Ok((Decimal::ONE / rate, RateLookupMethod::Inverse))
        );
    }

    /// Triangulated rates are the product of both legs.
    #[test]
    fn prop_triangulation_is_product(
        rate_in in positive_rate(),
        rate_out in positive_rate(),
    ) {
        let table = RateTable::from_rates(
            Currency::USD,
            [
                ExchangeRate {
                    from_currency: Currency::EUR,
                    to_currency: Currency::USD,
                    rate: rate_in,
                    effective_date: day(),
                },
                ExchangeRate {
                    from_currency: Currency::USD,
                    to_currency: Currency::GBP,
                    rate: rate_out,
                    effective_date: day(),
                },
            ],
        );
        prop_assert!(table.is_ok());
        let table = table.unwrap_or_default();

        let quote = table.find_rate(Currency::EUR, Currency::GBP, day());
        prop_assert_eq!(
            quote.map(|q| (q.rate, q.method)),
            Ok((rate_in * rate_out, RateLookupMethod::Triangulated))
        );
    }
}
