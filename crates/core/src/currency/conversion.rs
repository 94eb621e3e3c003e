//! Currency conversion logic.
//!
//! CRITICAL: Home-currency values are NOT rounded here. Balances accumulate
//! at full decimal precision and are rounded to cents only once, at the end.

use rust_decimal::Decimal;

/// Converts an amount to the home currency.
///
/// An absent rate means the amount is already in home currency (rate 1).
/// Products beyond the decimal range saturate instead of panicking.
#[must_use]
pub fn to_home(amount: Decimal, fx_rate_to_home: Option<Decimal>) -> Decimal {
    fx_rate_to_home.map_or(amount, |rate| amount.saturating_mul(rate))
}
