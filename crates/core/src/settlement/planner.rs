//! Greedy minimum-cash-flow settlement planning.
//!
//! Algorithm:
//! 1. Convert balances to integer cents, dropping negligible ones
//! 2. Split into debtors (< 0) and creditors (> 0)
//! 3. Debtors most negative first, creditors most positive first; the sort
//!    is stable so equal balances keep their input order
//! 4. Walk both lists, paying `min(debt, credit)` at each step and advancing
//!    whichever side reached zero (both may advance together)
//!
//! The pairing order is a deterministic heuristic. It is not guaranteed to
//! produce the fewest possible transfers.

use std::cmp::Reverse;
use std::collections::HashMap;

use rust_decimal::Decimal;
use tripsplit_shared::config::SettlementConfig;
use tripsplit_shared::types::ParticipantId;

use super::error::SettlementError;
use super::types::{SettlementPlan, SettlementTransfer};
use crate::balance::{BalanceLine, NetBalances};
use crate::money::MoneyConverter;

/// Plans the transfers that settle a set of net balances.
#[derive(Debug, Clone, Copy)]
pub struct SettlementPlanner {
    negligible: Decimal,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self::new(Decimal::new(1, 8))
    }
}

impl SettlementPlanner {
    /// Creates a planner that treats `|balance| <= negligible` as settled.
    #[must_use]
    pub const fn new(negligible: Decimal) -> Self {
        Self { negligible }
    }

    /// Creates a planner from settlement configuration.
    #[must_use]
    pub const fn from_config(config: &SettlementConfig) -> Self {
        Self::new(config.negligible_balance)
    }

    /// Plans transfers, discarding any residual.
    pub fn plan<I>(&self, balances: I) -> Vec<SettlementTransfer>
    where
        I: IntoIterator<Item = (ParticipantId, Decimal)>,
    {
        self.plan_detailed(balances).transfers
    }

    /// Plans transfers and reports balances left open by unbalanced input.
    ///
    /// Repeated participant IDs are summed into one balance.
    pub fn plan_detailed<I>(&self, balances: I) -> SettlementPlan
    where
        I: IntoIterator<Item = (ParticipantId, Decimal)>,
    {
        let (mut debtors, mut creditors): (Vec<_>, Vec<_>) = self
            .to_cents(balances)
            .into_iter()
            .partition(|(_, cents)| *cents < 0);

        debtors.sort_by_key(|(_, cents)| *cents);
        creditors.sort_by_key(|(_, cents)| Reverse(*cents));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let (debtor, debt) = debtors[i];
            let (creditor, credit) = creditors[j];
            let pay = debt.saturating_neg().min(credit);

            transfers.push(SettlementTransfer {
                from: debtor,
                to: creditor,
                amount: MoneyConverter::from_minor_units(pay),
            });

            debtors[i].1 = debt.saturating_add(pay);
            creditors[j].1 = credit - pay;

            if debtors[i].1 == 0 {
                i += 1;
            }
            if creditors[j].1 == 0 {
                j += 1;
            }
        }

        let unsettled = debtors[i..]
            .iter()
            .chain(&creditors[j..])
            .map(|(participant_id, cents)| BalanceLine {
                participant_id: *participant_id,
                net_amount: MoneyConverter::from_minor_units(*cents),
            })
            .collect();

        SettlementPlan {
            transfers,
            unsettled,
        }
    }

    /// Plans transfers after checking that the balances net to zero.
    ///
    /// The tolerance is half a cent per non-zero balance (the unattributed
    /// bucket included), rounded up to whole cents.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::Unbalanced` if the residual exceeds the
    /// tolerance.
    pub fn plan_checked(
        &self,
        balances: &NetBalances,
    ) -> Result<SettlementPlan, SettlementError> {
        let residual = balances.total();
        let nonzero = i64::try_from(balances.nonzero_count()).unwrap_or(i64::MAX);
        let tolerance_cents = nonzero.saturating_add(1) / 2;
        let tolerance = MoneyConverter::from_minor_units(tolerance_cents);

        if residual.abs() > tolerance {
            return Err(SettlementError::Unbalanced {
                residual,
                tolerance,
            });
        }

        Ok(self.plan_detailed(balances.iter()))
    }

    /// Merges repeated IDs, converts to cents and drops settled balances.
    fn to_cents<I>(&self, balances: I) -> Vec<(ParticipantId, i64)>
    where
        I: IntoIterator<Item = (ParticipantId, Decimal)>,
    {
        let mut index: HashMap<ParticipantId, usize> = HashMap::new();
        let mut merged: Vec<(ParticipantId, Decimal)> = Vec::new();
        for (participant_id, amount) in balances {
            if let Some(&idx) = index.get(&participant_id) {
                merged[idx].1 = merged[idx].1.saturating_add(amount);
            } else {
                index.insert(participant_id, merged.len());
                merged.push((participant_id, amount));
            }
        }

        merged
            .into_iter()
            .filter(|(_, amount)| amount.abs() > self.negligible)
            .map(|(id, amount)| (id, MoneyConverter::to_minor_units(amount)))
            .filter(|(_, cents)| *cents != 0)
            .collect()
    }
}
