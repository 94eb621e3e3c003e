//! Settlement service: validate, compute balances, plan transfers.

use rayon::prelude::*;
use tracing::{debug, info, warn};
use tripsplit_shared::config::SettlementConfig;

use super::error::SettlementError;
use super::planner::SettlementPlanner;
use super::types::TripSettlement;
use crate::balance::{BalanceCalculator, ExpenseBreakdown};
use crate::currency::{FxResolver, RateSource};
use crate::trip::{SnapshotValidator, TripSnapshot};

/// Settles trips end to end.
///
/// Stateless apart from configuration, so one instance can serve any number
/// of trips concurrently.
#[derive(Debug, Clone, Copy)]
pub struct SettlementService {
    calculator: BalanceCalculator,
    planner: SettlementPlanner,
    enforce_zero_sum: bool,
    validate_snapshots: bool,
}

impl Default for SettlementService {
    fn default() -> Self {
        Self::from_config(&SettlementConfig::default())
    }
}

impl SettlementService {
    /// Creates a service from its parts.
    ///
    /// Snapshot validation is on; see [`SettlementService::without_validation`].
    #[must_use]
    pub const fn new(
        calculator: BalanceCalculator,
        planner: SettlementPlanner,
        enforce_zero_sum: bool,
    ) -> Self {
        Self {
            calculator,
            planner,
            enforce_zero_sum,
            validate_snapshots: true,
        }
    }

    /// Skips structural snapshot validation, so refunds and zero rates are
    /// settled as given.
    #[must_use]
    pub const fn without_validation(mut self) -> Self {
        self.validate_snapshots = false;
        self
    }

    /// Creates a service from settlement configuration.
    #[must_use]
    pub const fn from_config(config: &SettlementConfig) -> Self {
        let service = Self::new(
            BalanceCalculator::from_config(config),
            SettlementPlanner::from_config(config),
            config.enforce_zero_sum,
        );
        if config.validate_snapshots {
            service
        } else {
            service.without_validation()
        }
    }

    /// Computes balances and the transfers that settle them.
    ///
    /// Exchange rates must already be present on foreign-currency values;
    /// see [`SettlementService::settle_with_rates`].
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::Snapshot` for a malformed snapshot (when
    /// validation is on) or an unknown participant, and
    /// `SettlementError::Unbalanced` when zero-sum enforcement is on and the
    /// balances do not net to zero.
    pub fn settle(&self, snapshot: &TripSnapshot) -> Result<TripSettlement, SettlementError> {
        if self.validate_snapshots {
            SnapshotValidator::validate(snapshot)?;
        }
        let (balances, summaries) = self.calculator.compute_with_summaries(snapshot)?;

        let plan = if self.enforce_zero_sum {
            self.planner.plan_checked(&balances)?
        } else {
            self.planner.plan_detailed(balances.iter())
        };

        if !plan.is_complete() {
            warn!(
                trip_id = %snapshot.trip_id,
                unsettled = plan.unsettled.len(),
                "Settlement leaves residual balances"
            );
        }

        debug!(
            trip_id = %snapshot.trip_id,
            transfers = plan.transfers.len(),
            total = %plan.total_transferred(),
            "Planned settlement"
        );

        Ok(TripSettlement {
            trip_id: snapshot.trip_id,
            home_currency: snapshot.home_currency,
            balances,
            summaries,
            transfers: plan.transfers,
            unsettled: plan.unsettled,
        })
    }

    /// Fills missing exchange rates from `rates`, then settles.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::Fx` when a rate cannot be resolved, otherwise
    /// the errors of [`SettlementService::settle`].
    pub fn settle_with_rates<S>(
        &self,
        snapshot: &TripSnapshot,
        rates: &S,
    ) -> Result<TripSettlement, SettlementError>
    where
        S: RateSource + ?Sized,
    {
        let resolved = FxResolver::new(rates).resolve(snapshot)?;
        self.settle(&resolved)
    }

    /// Settles many independent trips in parallel.
    ///
    /// Results are returned in input order.
    pub fn settle_all(
        &self,
        snapshots: &[TripSnapshot],
    ) -> Vec<Result<TripSettlement, SettlementError>> {
        let results: Vec<_> = snapshots.par_iter().map(|s| self.settle(s)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(trips = snapshots.len(), failed, "Batch settlement finished");
        results
    }

    /// Itemizes every expense of a trip into cent-exact shares.
    #[must_use]
    pub fn itemize(&self, snapshot: &TripSnapshot) -> Vec<ExpenseBreakdown> {
        snapshot
            .expenses
            .iter()
            .map(|e| ExpenseBreakdown::itemize(e, &snapshot.participants))
            .collect()
    }
}
