//! Exchange-rate storage and lookup.
//!
//! Lookup priority:
//! 1. Same currency (rate 1)
//! 2. Direct rate (from -> to), most recent on or before the date
//! 3. Inverse rate (to -> from, then invert)
//! 4. Triangulation through the pivot currency
//! 5. `FxError::RateNotFound`

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::Currency;

use super::error::FxError;
use super::exchange::ExchangeRate;

/// How an exchange rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLookupMethod {
    /// Direct rate found (from -> to).
    Direct,
    /// Inverse rate calculated (to -> from, then inverted).
    Inverse,
    /// Triangulated through the pivot currency.
    Triangulated,
}

/// Result of an exchange rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    /// The exchange rate (1 from = rate to).
    pub rate: Decimal,
    /// How the rate was obtained.
    pub method: RateLookupMethod,
    /// The effective date of the rate.
    pub effective_date: NaiveDate,
}

/// Anything able to quote a rate for a currency pair on a date.
pub trait RateSource {
    /// Finds the rate converting `from` into `to` effective on `on`.
    ///
    /// # Errors
    ///
    /// Returns `FxError::RateNotFound` when no rate is available.
    fn find_rate(&self, from: Currency, to: Currency, on: NaiveDate)
    -> Result<RateQuote, FxError>;
}

/// Plain lookup functions act as a direct-only rate source.
impl<F> RateSource for F
where
    F: Fn(Currency, Currency, NaiveDate) -> Option<Decimal>,
{
    fn find_rate(
        &self,
        from: Currency,
        to: Currency,
        on: NaiveDate,
    ) -> Result<RateQuote, FxError> {
        if from == to {
            return Ok(RateQuote {
                rate: Decimal::ONE,
                method: RateLookupMethod::Direct,
                effective_date: on,
            });
        }
        self(from, to, on)
            .filter(|rate| *rate > Decimal::ZERO)
            .map(|rate| RateQuote {
                rate,
                method: RateLookupMethod::Direct,
                effective_date: on,
            })
            .ok_or(FxError::RateNotFound { from, to, date: on })
    }
}

/// In-memory table of dated exchange rates.
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: HashMap<(Currency, Currency), BTreeMap<NaiveDate, Decimal>>,
    pivot: Currency,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(Currency::USD)
    }
}

impl RateTable {
    /// Creates an empty table triangulating through `pivot`.
    #[must_use]
    pub fn new(pivot: Currency) -> Self {
        Self {
            rates: HashMap::new(),
            pivot,
        }
    }

    /// Builds a table from a list of rates.
    ///
    /// # Errors
    ///
    /// Returns the first invalid rate's error.
    pub fn from_rates<I>(pivot: Currency, rates: I) -> Result<Self, FxError>
    where
        I: IntoIterator<Item = ExchangeRate>,
    {
        let mut table = Self::new(pivot);
        for rate in rates {
            table.insert(rate)?;
        }
        Ok(table)
    }

    /// The pivot currency used for triangulation.
    #[must_use]
    pub const fn pivot(&self) -> Currency {
        self.pivot
    }

    /// Number of stored (pair, date) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no rates are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores a rate; a rate for the same pair and date is replaced.
    ///
    /// # Errors
    ///
    /// Returns `FxError::NonPositiveRate` or `FxError::SameCurrency` for an
    /// invalid rate.
    pub fn insert(&mut self, rate: ExchangeRate) -> Result<(), FxError> {
        rate.validate()?;
        self.rates
            .entry((rate.from_currency, rate.to_currency))
            .or_default()
            .insert(rate.effective_date, rate.rate);
        Ok(())
    }

    /// Most recent stored rate for the exact pair on or before `on`.
    fn find_direct(
        &self,
        from: Currency,
        to: Currency,
        on: NaiveDate,
    ) -> Option<(Decimal, NaiveDate)> {
        self.rates
            .get(&(from, to))
            .and_then(|by_date| by_date.range(..=on).next_back())
            .map(|(date, rate)| (*rate, *date))
    }

    /// Direct rate, falling back to the inverted reverse pair.
    fn find_with_inverse(
        &self,
        from: Currency,
        to: Currency,
        on: NaiveDate,
    ) -> Option<(Decimal, NaiveDate, RateLookupMethod)> {
        if let Some((rate, date)) = self.find_direct(from, to, on) {
            return Some((rate, date, RateLookupMethod::Direct));
        }
        self.find_direct(to, from, on)
            .map(|(rate, date)| (Decimal::ONE / rate, date, RateLookupMethod::Inverse))
    }
}

impl RateSource for RateTable {
    fn find_rate(
        &self,
        from: Currency,
        to: Currency,
        on: NaiveDate,
    ) -> Result<RateQuote, FxError> {
        // Same currency = rate of 1
        if from == to {
            return Ok(RateQuote {
                rate: Decimal::ONE,
                method: RateLookupMethod::Direct,
                effective_date: on,
            });
        }

        if let Some((rate, effective_date, method)) = self.find_with_inverse(from, to, on) {
            return Ok(RateQuote {
                rate,
                method,
                effective_date,
            });
        }

        if from != self.pivot && to != self.pivot {
            let leg_in = self.find_with_inverse(from, self.pivot, on);
            let leg_out = self.find_with_inverse(self.pivot, to, on);
            if let (Some((rate1, date1, _)), Some((rate2, date2, _))) = (leg_in, leg_out) {
                // Use the older of the two dates as the effective date
                return Ok(RateQuote {
                    rate: rate1 * rate2,
                    method: RateLookupMethod::Triangulated,
                    effective_date: date1.min(date2),
                });
            }
        }

        Err(FxError::RateNotFound { from, to, date: on })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn rate(from: Currency, to: Currency, value: Decimal, day: u32) -> ExchangeRate {
        ExchangeRate::new(from, to, value, date(day)).unwrap()
    }

    #[test]
    fn test_same_currency_is_one() {
        let table = RateTable::new(Currency::USD);
        let quote = table.find_rate(Currency::EUR, Currency::EUR, date(1)).unwrap();
        assert_eq!(quote.rate, Decimal::ONE);
        assert_eq!(quote.method, RateLookupMethod::Direct);
    }

    #[test]
    fn test_direct_rate() {
        let table =
            RateTable::from_rates(Currency::USD, [rate(Currency::EUR, Currency::USD, dec!(1.10), 1)])
                .unwrap();
        let quote = table.find_rate(Currency::EUR, Currency::USD, date(5)).unwrap();
        assert_eq!(quote.rate, dec!(1.10));
        assert_eq!(quote.method, RateLookupMethod::Direct);
        assert_eq!(quote.effective_date, date(1));
    }

    #[test]
    fn test_inverse_rate() {
        let table =
            RateTable::from_rates(Currency::USD, [rate(Currency::USD, Currency::EUR, dec!(0.8), 1)])
                .unwrap();
        let quote = table.find_rate(Currency::EUR, Currency::USD, date(1)).unwrap();
        assert_eq!(quote.rate, dec!(1.25));
        assert_eq!(quote.method, RateLookupMethod::Inverse);
    }

    #[test]
    fn test_triangulation_through_pivot() {
        // EUR -> USD = 1.10, USD -> GBP = 0.80, so EUR -> GBP = 0.88
        let table = RateTable::from_rates(
            Currency::USD,
            [
                rate(Currency::EUR, Currency::USD, dec!(1.10), 3),
                rate(Currency::USD, Currency::GBP, dec!(0.80), 2),
            ],
        )
        .unwrap();
        let quote = table.find_rate(Currency::EUR, Currency::GBP, date(10)).unwrap();
        assert_eq!(quote.rate, dec!(0.88));
        assert_eq!(quote.method, RateLookupMethod::Triangulated);
        assert_eq!(quote.effective_date, date(2));
    }

    #[test]
    fn test_triangulation_with_inverse_legs() {
        let table = RateTable::from_rates(
            Currency::USD,
            [
                rate(Currency::USD, Currency::EUR, dec!(0.91), 1),
                rate(Currency::GBP, Currency::USD, dec!(1.25), 1),
            ],
        )
        .unwrap();
        let quote = table.find_rate(Currency::EUR, Currency::GBP, date(1)).unwrap();
        let expected = (Decimal::ONE / dec!(0.91)) * (Decimal::ONE / dec!(1.25));
        assert_eq!(quote.rate, expected);
        assert_eq!(quote.method, RateLookupMethod::Triangulated);
    }

    #[test]
    fn test_most_recent_rate_on_or_before_date() {
        let table = RateTable::from_rates(
            Currency::USD,
            [
                rate(Currency::EUR, Currency::USD, dec!(1.05), 1),
                rate(Currency::EUR, Currency::USD, dec!(1.10), 10),
                rate(Currency::EUR, Currency::USD, dec!(1.20), 20),
            ],
        )
        .unwrap();
        let quote = table.find_rate(Currency::EUR, Currency::USD, date(15)).unwrap();
        assert_eq!(quote.rate, dec!(1.10));
        assert_eq!(quote.effective_date, date(10));
    }

    #[test]
    fn test_rate_after_date_is_ignored() {
        let table =
            RateTable::from_rates(Currency::USD, [rate(Currency::EUR, Currency::USD, dec!(1.10), 10)])
                .unwrap();
        assert_eq!(
            table.find_rate(Currency::EUR, Currency::USD, date(9)),
            Err(FxError::RateNotFound {
                from: Currency::EUR,
                to: Currency::USD,
                date: date(9),
            })
        );
    }

    #[test]
    fn test_insert_replaces_same_date() {
        let mut table = RateTable::new(Currency::USD);
        table.insert(rate(Currency::EUR, Currency::USD, dec!(1.10), 1)).unwrap();
        table.insert(rate(Currency::EUR, Currency::USD, dec!(1.12), 1)).unwrap();
        assert_eq!(table.len(), 1);
        let quote = table.find_rate(Currency::EUR, Currency::USD, date(1)).unwrap();
        assert_eq!(quote.rate, dec!(1.12));
    }

    #[test]
    fn test_insert_rejects_invalid_rate() {
        let mut table = RateTable::new(Currency::USD);
        let bad = ExchangeRate {
            from_currency: Currency::EUR,
            to_currency: Currency::USD,
            rate: dec!(0),
            effective_date: date(1),
        };
        assert_eq!(table.insert(bad), Err(FxError::NonPositiveRate));
        assert!(table.is_empty());
    }

    #[test]
    fn test_closure_rate_source() {
        let source = |from: Currency, to: Currency, _on: NaiveDate| {
            (from == Currency::EUR && to == Currency::USD).then_some(dec!(1.1))
        };
        let quote = source.find_rate(Currency::EUR, Currency::USD, date(1)).unwrap();
        assert_eq!(quote.rate, dec!(1.1));
        assert!(source.find_rate(Currency::GBP, Currency::USD, date(1)).is_err());
    }
}
