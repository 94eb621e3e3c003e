//! Per-expense share itemization in whole cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{ExpenseId, ParticipantId};

use super::policy::SharePolicy;
use crate::currency::AllocationUtil;
use crate::money::MoneyConverter;
use crate::trip::{Expense, Participant};

/// One participant's part of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLine {
    /// The debited participant.
    pub participant_id: ParticipantId,
    /// Share in home currency, whole cents.
    pub amount: Decimal,
}

/// An expense broken down into cent-exact shares.
///
/// Unlike net balances, the lines here sum exactly to the rounded total, so
/// they can be displayed next to the expense. Leftover cents go to the
/// largest fractional remainders, earlier splits first on ties. If every
/// weight is zero all lines are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    /// The expense.
    pub expense_id: ExpenseId,
    /// Who paid.
    pub payer_id: ParticipantId,
    /// Home-currency total rounded to cents.
    pub total: Decimal,
    /// The share policy applied.
    pub policy: SharePolicy,
    /// Share lines in split order (participant order for whole-trip splits).
    pub shares: Vec<ShareLine>,
}

impl ExpenseBreakdown {
    /// Itemizes `expense` over the trip's `participants`.
    #[must_use]
    pub fn itemize(expense: &Expense, participants: &[Participant]) -> Self {
        let policy = SharePolicy::resolve(&expense.splits);
        let total_cents = MoneyConverter::to_minor_units(expense.total_home());

        let weights = policy.weights(&expense.splits, participants);
        let values: Vec<Decimal> = weights.iter().map(|(_, w)| *w).collect();
        let cents = AllocationUtil::allocate_by_weights(total_cents, &values);

        let shares = weights
            .iter()
            .zip(cents)
            .map(|((participant_id, _), c)| ShareLine {
                participant_id: *participant_id,
                amount: MoneyConverter::from_minor_units(c),
            })
            .collect();

        Self {
            expense_id: expense.id,
            payer_id: expense.payer_id,
            total: MoneyConverter::from_minor_units(total_cents),
            policy,
            shares,
        }
    }

    /// Sum of the share lines.
    #[must_use]
    pub fn allocated(&self) -> Decimal {
        self.shares.iter().map(|s| s.amount).sum()
    }
}
