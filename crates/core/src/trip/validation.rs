//! Structural validation of trip snapshots.
//!
//! The balance calculator takes values as given; callers that want malformed
//! input rejected run [`SnapshotValidator`] first (the settlement service does
//! when `settlement.validate_snapshots` is set).
//!
//! Membership (payers and split participants being on the trip) is left to
//! the balance calculator, which applies the configured
//! `UnknownParticipantPolicy`.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::SnapshotError;
use super::types::TripSnapshot;
use crate::balance::SharePolicy;

/// Validator for trip snapshots.
pub struct SnapshotValidator;

impl SnapshotValidator {
    /// Validates every participant, expense and payment of a snapshot.
    ///
    /// Returns the first violation found, in participant, expense, payment order.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` describing the first malformed value.
    pub fn validate(snapshot: &TripSnapshot) -> Result<(), SnapshotError> {
        let mut seen = HashSet::with_capacity(snapshot.participants.len());
        for participant in &snapshot.participants {
            if !seen.insert(participant.id) {
                return Err(SnapshotError::DuplicateParticipant(participant.id));
            }
            if participant.weight < Decimal::ZERO {
                return Err(SnapshotError::NegativeWeight(participant.id));
            }
        }

        for expense in &snapshot.expenses {
            if expense.amount.is_negative() {
                return Err(SnapshotError::NegativeAmount(expense.id));
            }
            if expense.fx_rate_to_home.is_some_and(|rate| rate <= Decimal::ZERO) {
                return Err(SnapshotError::NonPositiveFxRate(expense.id));
            }
            // Custom shares read `share_value` from every split, whatever its type
            if SharePolicy::resolve(&expense.splits) == SharePolicy::Custom {
                for split in &expense.splits {
                    if split.share_value.is_some_and(|v| v < Decimal::ZERO) {
                        return Err(SnapshotError::NegativeShareValue {
                            expense_id: expense.id,
                            participant_id: split.participant_id,
                        });
                    }
                }
            }
        }

        for payment in &snapshot.payments {
            if payment.from_participant_id == payment.to_participant_id {
                return Err(SnapshotError::SelfPayment(payment.id));
            }
            if payment.amount.amount <= Decimal::ZERO {
                return Err(SnapshotError::NonPositivePayment(payment.id));
            }
            if payment.fx_rate_to_home.is_some_and(|rate| rate <= Decimal::ZERO) {
                return Err(SnapshotError::NonPositivePaymentFxRate(payment.id));
            }
        }

        Ok(())
    }
}
