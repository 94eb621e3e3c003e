//! Exchange-rate error types.

use chrono::NaiveDate;
use thiserror::Error;
use tripsplit_shared::AppError;
use tripsplit_shared::types::{Currency, ExpenseId, PaymentId};

/// Errors raised while storing or resolving exchange rates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// Rate must be positive.
    #[error("Exchange rate must be positive")]
    NonPositiveRate,

    /// Currencies must be different.
    #[error("From and to currencies must be different")]
    SameCurrency,

    /// No direct, inverse or triangulated rate exists.
    #[error("No exchange rate found for {from}/{to} on or before {date}")]
    RateNotFound {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
        /// Date for which the rate was requested.
        date: NaiveDate,
    },

    /// A foreign-currency expense has neither a rate nor a date to look one up.
    #[error("Expense {0} in a foreign currency has no exchange rate and no date")]
    MissingExpenseDate(ExpenseId),

    /// A foreign-currency payment has neither a rate nor a date to look one up.
    #[error("Payment {0} in a foreign currency has no exchange rate and no date")]
    MissingPaymentDate(PaymentId),
}

impl From<FxError> for AppError {
    fn from(err: FxError) -> Self {
        match err {
            FxError::RateNotFound { .. } => Self::ExternalService(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
