//! Multi-currency handling and exchange rates.

pub mod allocation;
pub mod conversion;
pub mod error;
pub mod exchange;
pub mod rates;
pub mod resolver;

#[cfg(test)]
mod props;

pub use allocation::AllocationUtil;
pub use conversion::to_home;
pub use error::FxError;
pub use exchange::ExchangeRate;
pub use rates::{RateLookupMethod, RateQuote, RateSource, RateTable};
pub use resolver::FxResolver;
