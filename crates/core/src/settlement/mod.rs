//! Debt settlement.
//!
//! Turns net balances into a short, deterministic list of pairwise
//! transfers using integer cents.

pub mod error;
pub mod planner;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::SettlementError;
pub use planner::SettlementPlanner;
pub use service::SettlementService;
pub use types::{SettlementPlan, SettlementTransfer, TripSettlement};
