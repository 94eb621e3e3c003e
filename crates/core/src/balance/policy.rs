//! Share policy resolution for a single expense.
//!
//! Precedence, resolved once per expense:
//! 1. No splits -> equal among every trip participant
//! 2. Any `custom` split -> proportional to `share_value`
//! 3. Any `weight` split -> proportional to participant weight
//! 4. Otherwise -> equal among the listed participants

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::ParticipantId;

use crate::trip::{Participant, ShareType, Split};

/// How an expense's home-currency total is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharePolicy {
    /// Equal shares among every participant of the trip.
    WholeTrip,
    /// Shares proportional to each split's `share_value`.
    Custom,
    /// Shares proportional to each listed participant's weight.
    Weighted,
    /// Equal shares among the listed participants.
    EqualAmongListed,
}

impl SharePolicy {
    /// Picks the policy for an expense from its splits.
    #[must_use]
    pub fn resolve(splits: &[Split]) -> Self {
        if splits.is_empty() {
            Self::WholeTrip
        } else if splits.iter().any(|s| s.is(ShareType::Custom)) {
            Self::Custom
        } else if splits.iter().any(|s| s.is(ShareType::Weight)) {
            Self::Weighted
        } else {
            Self::EqualAmongListed
        }
    }

    /// Relative weight of every debited participant, in split order.
    ///
    /// Under `Custom` a missing `share_value` counts as zero. Under `Weighted`
    /// a participant missing from `participants` weighs one.
    #[must_use]
    pub fn weights(
        self,
        splits: &[Split],
        participants: &[Participant],
    ) -> Vec<(ParticipantId, Decimal)> {
        match self {
            Self::WholeTrip => participants.iter().map(|p| (p.id, Decimal::ONE)).collect(),
            Self::Custom => splits
                .iter()
                .map(|s| (s.participant_id, s.share_value.unwrap_or(Decimal::ZERO)))
                .collect(),
            Self::Weighted => {
                let by_id: HashMap<ParticipantId, Decimal> =
                    participants.iter().map(|p| (p.id, p.weight)).collect();
                splits
                    .iter()
                    .map(|s| {
                        let weight = by_id
                            .get(&s.participant_id)
                            .copied()
                            .unwrap_or(Decimal::ONE);
                        (s.participant_id, weight)
                    })
                    .collect()
            }
            Self::EqualAmongListed => splits
                .iter()
                .map(|s| (s.participant_id, Decimal::ONE))
                .collect(),
        }
    }

    /// Divides `total` according to this policy, unrounded.
    ///
    /// When the weights sum to zero every share is zero.
    #[must_use]
    pub fn shares(
        self,
        total: Decimal,
        splits: &[Split],
        participants: &[Participant],
    ) -> Vec<(ParticipantId, Decimal)> {
        let weights = self.weights(splits, participants);
        let weight_sum = weights
            .iter()
            .fold(Decimal::ZERO, |acc, (_, w)| acc.saturating_add(*w));

        weights
            .into_iter()
            .map(|(id, weight)| (id, proportion(total, weight, weight_sum)))
            .collect()
    }
}

/// `total * weight / weight_sum`, zero for a non-positive sum.
fn proportion(total: Decimal, weight: Decimal, weight_sum: Decimal) -> Decimal {
    if weight_sum <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    // Multiply first so exact fractions stay exact (90 * 1 / 3 = 30)
    total
        .checked_mul(weight)
        .and_then(|scaled| scaled.checked_div(weight_sum))
        .or_else(|| weight.checked_div(weight_sum).and_then(|f| total.checked_mul(f)))
        .unwrap_or(Decimal::ZERO)
}
