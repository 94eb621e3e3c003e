//! Exchange rate types and logic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::Currency;

use super::error::FxError;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: Currency,
    /// Target currency code.
    pub to_currency: Currency,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// Date this rate is effective.
    pub effective_date: NaiveDate,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    ///
    /// # Errors
    ///
    /// Returns `FxError::NonPositiveRate` if the rate is zero or negative, and
    /// `FxError::SameCurrency` if both currencies are equal.
    pub fn new(
        from_currency: Currency,
        to_currency: Currency,
        rate: Decimal,
        effective_date: NaiveDate,
    ) -> Result<Self, FxError> {
        let rate = Self {
            from_currency,
            to_currency,
            rate,
            effective_date,
        };
        rate.validate()?;
        Ok(rate)
    }

    /// Checks the invariants of a rate (e.g. one deserialized from input).
    ///
    /// # Errors
    ///
    /// Same as [`ExchangeRate::new`].
    pub fn validate(&self) -> Result<(), FxError> {
        if self.rate <= Decimal::ZERO {
            return Err(FxError::NonPositiveRate);
        }
        if self.from_currency == self.to_currency {
            return Err(FxError::SameCurrency);
        }
        Ok(())
    }

    /// Returns the inverse rate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            from_currency: self.to_currency,
            to_currency: self.from_currency,
            rate: Decimal::ONE / self.rate,
            effective_date: self.effective_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_new_rejects_non_positive_rate() {
        assert_eq!(
            ExchangeRate::new(Currency::EUR, Currency::USD, dec!(0), day()),
            Err(FxError::NonPositiveRate)
        );
        assert_eq!(
            ExchangeRate::new(Currency::EUR, Currency::USD, dec!(-1.1), day()),
            Err(FxError::NonPositiveRate)
        );
    }

    #[test]
    fn test_new_rejects_same_currency() {
        assert_eq!(
            ExchangeRate::new(Currency::EUR, Currency::EUR, dec!(1), day()),
            Err(FxError::SameCurrency)
        );
    }

    #[test]
    fn test_inverse() {
        let rate = ExchangeRate::new(Currency::USD, Currency::EUR, dec!(0.8), day()).unwrap();
        let inverse = rate.inverse();
        assert_eq!(inverse.from_currency, Currency::EUR);
        assert_eq!(inverse.to_currency, Currency::USD);
        assert_eq!(inverse.rate, dec!(1.25));
        assert_eq!(inverse.effective_date, day());
    }
}
