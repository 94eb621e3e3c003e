//! Conversion between decimal amounts and integer minor units ("cents").
//!
//! CRITICAL: Rounding strategy for cents:
//! - Round half away from zero (2.675 -> 2.68, -2.675 -> -2.68)
//! - Symmetric around zero: rounding -x gives minus the rounding of x

use std::str::FromStr;

use rust_decimal::prelude::*;

/// Minor units per major unit (two decimal places).
pub const CENTS_PER_UNIT: i64 = 100;

/// Fixed-point money converter.
///
/// Pure functions with no hidden state: repeated calls with the same input
/// always return the same output.
pub struct MoneyConverter;

impl MoneyConverter {
    /// Converts a decimal amount to integer cents, rounding half away from zero.
    ///
    /// Amounts outside the `i64` cents range saturate at `i64::MIN`/`i64::MAX`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tripsplit_core::money::MoneyConverter;
    ///
    /// assert_eq!(MoneyConverter::to_minor_units(dec!(12.345)), 1235);
    /// assert_eq!(MoneyConverter::to_minor_units(dec!(-12.345)), -1235);
    /// ```
    #[must_use]
    pub fn to_minor_units(value: Decimal) -> i64 {
        value
            .checked_mul(Decimal::from(CENTS_PER_UNIT))
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|cents| cents.to_i64())
            .unwrap_or_else(|| Self::saturate(value))
    }

    /// Converts integer cents back to a decimal amount. Exact, no rounding.
    #[must_use]
    pub fn from_minor_units(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    /// Rounds a decimal amount to whole cents.
    #[must_use]
    pub fn round_to_cents(value: Decimal) -> Decimal {
        Self::from_minor_units(Self::to_minor_units(value))
    }

    /// Converts a binary float (e.g. a legacy `Float` column) to integer cents.
    ///
    /// The float is read through its shortest decimal representation, so
    /// `2.675_f64` is treated as `2.675` and rounds to `268`. Returns `None` for
    /// NaN, infinities and values beyond the decimal range.
    #[must_use]
    pub fn to_minor_units_f64(value: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(value))
            .map(Self::to_minor_units)
    }

    fn saturate(value: Decimal) -> i64 {
        if value.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }
    }
}
