//! Net balance computation.
//!
//! Credits each expense's home-currency value to its payer, debits it across
//! participants per the resolved [`SharePolicy`], and applies completed
//! payments.

pub mod breakdown;
pub mod calculator;
pub mod policy;
pub mod types;

#[cfg(test)]
mod props;

pub use breakdown::{ExpenseBreakdown, ShareLine};
pub use calculator::BalanceCalculator;
pub use policy::SharePolicy;
pub use types::{BalanceLine, NetBalances, ParticipantSummary};
