//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Balance and settlement configuration.
    pub settlement: SettlementConfig,
    /// Exchange-rate resolution configuration.
    pub fx: FxConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// How the balance calculator treats a payer or split participant that is
/// missing from the trip's participant list (e.g. a removed participant).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownParticipantPolicy {
    /// Fail the calculation with a validation error.
    #[default]
    Reject,
    /// Accumulate the value into a visible unattributed bucket.
    Unattributed,
}

/// Balance and settlement configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Policy for participants referenced by expenses but absent from the trip.
    pub unknown_participant: UnknownParticipantPolicy,
    /// Balances at or below this magnitude are considered settled.
    pub negligible_balance: Decimal,
    /// Reject balances that do not net to zero before planning transfers.
    pub enforce_zero_sum: bool,
    /// Run structural snapshot validation before computing balances.
    pub validate_snapshots: bool,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            unknown_participant: UnknownParticipantPolicy::default(),
            negligible_balance: default_negligible_balance(),
            enforce_zero_sum: true,
            validate_snapshots: true,
        }
    }
}

fn default_negligible_balance() -> Decimal {
    Decimal::new(1, 8) // 1e-8
}

/// Exchange-rate resolution configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    /// Currency used to triangulate pairs with no direct or inverse rate.
    pub pivot_currency: Currency,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            pivot_currency: Currency::USD,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tripsplit=info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `TRIPSPLIT__*` variables
    /// (e.g. `TRIPSPLIT__SETTLEMENT__UNKNOWN_PARTICIPANT=unattributed`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TRIPSPLIT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
