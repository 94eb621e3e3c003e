//! Core business logic for Tripsplit.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every computation runs over an immutable [`trip::TripSnapshot`] supplied by the
//! caller, so concurrent calls never share mutable state.
//!
//! # Modules
//!
//! - `money` - Fixed-point conversion between decimal amounts and integer cents
//! - `currency` - Home-currency conversion, exchange-rate lookup, allocation
//! - `trip` - Snapshot types (participants, expenses, splits, payments) and validation
//! - `balance` - Share-policy resolution and net balance calculation
//! - `settlement` - Greedy minimum-cash-flow planning and the settlement service

pub mod balance;
pub mod currency;
pub mod money;
pub mod settlement;
pub mod trip;

pub use balance::{BalanceCalculator, NetBalances};
pub use currency::{FxResolver, RateSource, RateTable};
pub use money::MoneyConverter;
pub use settlement::{
    SettlementError, SettlementPlanner, SettlementService, SettlementTransfer, TripSettlement,
};
pub use trip::TripSnapshot;

use rust_decimal::Decimal;
use tripsplit_shared::types::{Currency, ParticipantId};

use trip::{Expense, Participant};

/// Computes one net balance per participant, rounded to cents.
///
/// Participants or splits that reference unknown participants are rejected;
/// use [`BalanceCalculator`] directly to choose another policy.
///
/// # Errors
///
/// Returns [`trip::SnapshotError::UnknownParticipant`] when an expense refers to
/// a participant missing from `participants`.
pub fn compute_net_balances(
    home_currency: Currency,
    participants: &[Participant],
    expenses: &[Expense],
) -> Result<NetBalances, trip::SnapshotError> {
    let snapshot = trip::TripSnapshot::new(home_currency, participants.to_vec(), expenses.to_vec());
    BalanceCalculator::default().compute(&snapshot)
}

/// Plans the greedy sequence of transfers that settles `balances`.
///
/// Ties between equal balances keep the iteration order of `balances`.
pub fn plan_settlements<I>(balances: I) -> Vec<SettlementTransfer>
where
    I: IntoIterator<Item = (ParticipantId, Decimal)>,
{
    SettlementPlanner::default().plan(balances)
}
