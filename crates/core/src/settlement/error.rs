//! Settlement error types.

use rust_decimal::Decimal;
use thiserror::Error;
use tripsplit_shared::AppError;

use crate::currency::FxError;
use crate::trip::SnapshotError;

/// Errors raised while settling a trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Balances do not net to zero within rounding tolerance.
    #[error("Balances do not net to zero: residual {residual} exceeds tolerance {tolerance}")]
    Unbalanced {
        /// Sum of all balances, including unattributed value.
        residual: Decimal,
        /// Largest residual explained by rounding.
        tolerance: Decimal,
    },

    /// The trip snapshot is malformed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// An exchange rate could not be resolved.
    #[error(transparent)]
    Fx(#[from] FxError),
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::Unbalanced { .. } => Self::BusinessRule(err.to_string()),
            SettlementError::Snapshot(e) => e.into(),
            SettlementError::Fx(e) => e.into(),
        }
    }
}
