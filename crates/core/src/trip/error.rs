//! Snapshot error types.
//!
//! These are caller contract violations: the engine never panics on them, it
//! reports them so the request layer can surface a validation failure.

use thiserror::Error;
use tripsplit_shared::AppError;
use tripsplit_shared::types::{ExpenseId, ParticipantId, PaymentId};

/// Errors found in a trip snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    // ========== Membership Errors ==========
    /// An expense refers to a participant that is not on the trip.
    #[error("Expense {expense_id} refers to unknown participant {participant_id}")]
    UnknownParticipant {
        /// The offending expense.
        expense_id: ExpenseId,
        /// The participant missing from the trip.
        participant_id: ParticipantId,
    },

    /// A recorded payment refers to a participant that is not on the trip.
    #[error("Payment {payment_id} refers to unknown participant {participant_id}")]
    UnknownPaymentParticipant {
        /// The offending payment.
        payment_id: PaymentId,
        /// The participant missing from the trip.
        participant_id: ParticipantId,
    },

    /// The same participant ID appears twice in the participant list.
    #[error("Participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),

    // ========== Value Errors ==========
    /// Participant weight cannot be negative.
    #[error("Participant {0} has a negative weight")]
    NegativeWeight(ParticipantId),

    /// Expense amount cannot be negative.
    #[error("Expense {0} has a negative amount")]
    NegativeAmount(ExpenseId),

    /// Exchange rate must be positive.
    #[error("Expense {0} has a non-positive exchange rate")]
    NonPositiveFxRate(ExpenseId),

    /// Custom share value cannot be negative.
    #[error("Expense {expense_id} has a negative custom share for {participant_id}")]
    NegativeShareValue {
        /// The offending expense.
        expense_id: ExpenseId,
        /// The participant whose share is negative.
        participant_id: ParticipantId,
    },

    // ========== Payment Errors ==========
    /// A participant cannot pay themselves.
    #[error("Payment {0} is from a participant to themselves")]
    SelfPayment(PaymentId),

    /// Payment amount must be positive.
    #[error("Payment {0} must have a positive amount")]
    NonPositivePayment(PaymentId),

    /// Payment exchange rate must be positive.
    #[error("Payment {0} has a non-positive exchange rate")]
    NonPositivePaymentFxRate(PaymentId),
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        Self::Validation(err.to_string())
    }
}
