//! Balance result types.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::ParticipantId;

/// Net position of one participant, rounded to cents.
///
/// Positive means the participant is owed money, negative means they owe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    /// The participant.
    pub participant_id: ParticipantId,
    /// Net amount in home currency.
    pub net_amount: Decimal,
}

/// Net balances of a trip, one line per current participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalances {
    /// Balance lines in participant order.
    pub lines: Vec<BalanceLine>,
    /// Value credited to or debited from participants no longer on the trip.
    #[serde(default)]
    pub unattributed: Decimal,
    /// The unknown participants that contributed to `unattributed`.
    #[serde(default)]
    pub unattributed_participants: Vec<ParticipantId>,
    #[serde(skip)]
    unrounded_total: Decimal,
}

impl NetBalances {
    pub(crate) fn new(
        lines: Vec<BalanceLine>,
        unattributed: Decimal,
        unattributed_participants: Vec<ParticipantId>,
        unrounded_total: Decimal,
    ) -> Self {
        Self {
            lines,
            unattributed,
            unattributed_participants,
            unrounded_total,
        }
    }

    /// Builds balances from already-rounded amounts, e.g. from storage.
    #[must_use]
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (ParticipantId, Decimal)>,
    {
        let lines: Vec<BalanceLine> = lines
            .into_iter()
            .map(|(participant_id, net_amount)| BalanceLine {
                participant_id,
                net_amount,
            })
            .collect();
        let unrounded_total = lines.iter().map(|l| l.net_amount).sum();
        Self::new(lines, Decimal::ZERO, Vec::new(), unrounded_total)
    }

    /// Balance of one participant.
    #[must_use]
    pub fn get(&self, participant_id: ParticipantId) -> Option<Decimal> {
        self.lines
            .iter()
            .find(|l| l.participant_id == participant_id)
            .map(|l| l.net_amount)
    }

    /// Iterates `(participant, balance)` pairs in participant order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, Decimal)> + '_ {
        self.lines.iter().map(|l| (l.participant_id, l.net_amount))
    }

    /// Balances keyed by participant.
    #[must_use]
    pub fn to_map(&self) -> HashMap<ParticipantId, Decimal> {
        self.iter().collect()
    }

    /// Number of balance lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if there are no balance lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of the rounded lines plus the unattributed bucket.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.net_amount).sum::<Decimal>() + self.unattributed
    }

    /// Sum of all balances before rounding, including unattributed value.
    ///
    /// Zero up to decimal precision for any well-formed trip.
    #[must_use]
    pub const fn unrounded_total(&self) -> Decimal {
        self.unrounded_total
    }

    /// Number of non-zero entries, counting the unattributed bucket.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        let lines = self.lines.iter().filter(|l| !l.net_amount.is_zero()).count();
        lines + usize::from(!self.unattributed.is_zero())
    }
}

/// Per-participant totals behind a net balance, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    /// The participant.
    pub participant_id: ParticipantId,
    /// Name shown in summaries.
    pub display_name: String,
    /// Total of expenses this participant paid.
    pub total_paid: Decimal,
    /// Total of expense shares debited to this participant.
    pub total_share: Decimal,
    /// Completed payments this participant sent.
    pub payments_sent: Decimal,
    /// Completed payments this participant received.
    pub payments_received: Decimal,
    /// `paid - share + sent - received`, rounded once.
    pub net: Decimal,
}
