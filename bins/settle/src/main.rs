//! Tripsplit settlement CLI
//!
//! Reads a trip snapshot and optional exchange rates from a JSON file and
//! prints balances, transfers and per-expense shares as JSON.
//!
//! Usage: settle <trip.json>
//!
//! Failures are printed with their error code. Exit status is 2 when the
//! input is at fault and 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tripsplit_core::balance::ExpenseBreakdown;
use tripsplit_core::currency::ExchangeRate;
use tripsplit_core::{FxResolver, RateTable, SettlementService, TripSettlement, TripSnapshot};
use tripsplit_shared::{AppConfig, AppError};
use tripsplit_shared::config::LoggingConfig;

/// Input document.
#[derive(Debug, Deserialize)]
struct SettleRequest {
    trip: TripSnapshot,
    #[serde(default)]
    rates: Vec<ExchangeRate>,
}

/// Output document.
#[derive(Debug, Serialize)]
struct SettleReport {
    settlement: TripSettlement,
    expenses: Vec<ExpenseBreakdown>,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, client_error) = classify(&err);
            error!(code, client_error, "{err:#}");
            eprintln!("error [{code}]: {err:#}");
            if client_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()
        .map_err(AppError::from)
        .context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        return Err(AppError::Validation("usage: settle <trip.json>".to_string()).into());
    };

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| AppError::NotFound(format!("{}: {e}", path.display())))?;
    let request: SettleRequest = serde_json::from_str(&raw)
        .map_err(|e| AppError::Validation(e.to_string()))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let rates = RateTable::from_rates(config.fx.pivot_currency, request.rates)
        .map_err(AppError::from)
        .context("Invalid exchange rate in input")?;

    let trip = FxResolver::new(&rates)
        .resolve(&request.trip)
        .map_err(AppError::from)
        .context("Failed to resolve exchange rates")?;

    let service = SettlementService::from_config(&config.settlement);
    let settlement = service
        .settle(&trip)
        .map_err(AppError::from)
        .context("Failed to settle trip")?;
    let expenses = service.itemize(&trip);

    info!(
        trip_id = %settlement.trip_id,
        transfers = settlement.transfers.len(),
        "Trip settled"
    );

    let report = SettleReport {
        settlement,
        expenses,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Stable error code and whether the input was at fault.
///
/// Errors that never passed through `AppError` are internal.
fn classify(err: &anyhow::Error) -> (&'static str, bool) {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<AppError>())
        .map_or(("INTERNAL_ERROR", false), |app| {
            (app.error_code(), app.is_client_error())
        })
}

/// Installs the global subscriber; `RUST_LOG` overrides the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
