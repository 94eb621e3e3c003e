//! Settlement types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripsplit_shared::types::{Currency, ParticipantId, TripId};

use crate::balance::{BalanceLine, NetBalances, ParticipantSummary};

/// A single payment that moves money from a debtor to a creditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTransfer {
    /// Paying participant (debtor).
    pub from: ParticipantId,
    /// Receiving participant (creditor).
    pub to: ParticipantId,
    /// Amount in home currency, strictly positive, whole cents.
    pub amount: Decimal,
}

/// Transfers plus whatever the transfers could not settle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Transfers in the order they were planned.
    pub transfers: Vec<SettlementTransfer>,
    /// Residual balances left when the input did not net to zero.
    pub unsettled: Vec<BalanceLine>,
}

impl SettlementPlan {
    /// Returns true if every balance was settled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unsettled.is_empty()
    }

    /// Total amount moved by the transfers.
    #[must_use]
    pub fn total_transferred(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Balances and settlement plan of one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSettlement {
    /// The trip.
    pub trip_id: TripId,
    /// Currency of every amount below.
    pub home_currency: Currency,
    /// Net balance per participant.
    pub balances: NetBalances,
    /// Totals behind each balance.
    pub summaries: Vec<ParticipantSummary>,
    /// Transfers that settle the balances.
    pub transfers: Vec<SettlementTransfer>,
    /// Balances the transfers leave open.
    pub unsettled: Vec<BalanceLine>,
}
