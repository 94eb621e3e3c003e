//! Fills in missing exchange rates on a trip snapshot.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use tripsplit_shared::types::Currency;

use super::error::FxError;
use super::rates::RateSource;
use crate::trip::TripSnapshot;

/// Resolves `fx_rate_to_home` for foreign-currency expenses and payments.
///
/// Values that already carry a rate, or that are in the home currency, are
/// left untouched.
pub struct FxResolver<'a, S: RateSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: RateSource + ?Sized> FxResolver<'a, S> {
    /// Creates a resolver backed by `source`.
    #[must_use]
    pub const fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Returns a copy of `snapshot` with every missing rate filled in.
    ///
    /// # Errors
    ///
    /// Returns `FxError::MissingExpenseDate` / `FxError::MissingPaymentDate`
    /// when a foreign value has no date, or the source's error when no rate
    /// exists for that date.
    pub fn resolve(&self, snapshot: &TripSnapshot) -> Result<TripSnapshot, FxError> {
        let home = snapshot.home_currency;
        let mut resolved = snapshot.clone();

        for expense in &mut resolved.expenses {
            if expense.fx_rate_to_home.is_some() || expense.amount.currency == home {
                continue;
            }
            let date = expense.date.ok_or(FxError::MissingExpenseDate(expense.id))?;
            let rate = self.rate_to_home(expense.amount.currency, home, date)?;
            expense.fx_rate_to_home = Some(rate);
        }

        for payment in &mut resolved.payments {
            if payment.fx_rate_to_home.is_some() || payment.amount.currency == home {
                continue;
            }
            let date = payment.date.ok_or(FxError::MissingPaymentDate(payment.id))?;
            let rate = self.rate_to_home(payment.amount.currency, home, date)?;
            payment.fx_rate_to_home = Some(rate);
        }

        Ok(resolved)
    }

    fn rate_to_home(
        &self,
        from: Currency,
        home: Currency,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        let quote = self.source.find_rate(from, home, date)?;
        debug!(
            from = %from,
            to = %home,
            %date,
            rate = %quote.rate,
            method = ?quote.method,
            "Resolved exchange rate"
        );
        Ok(quote.rate)
    }
}
