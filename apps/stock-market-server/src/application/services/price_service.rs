//! Price Service
//!
//! Single-call price lookup used by every RPC shape. Each lookup first runs
//! the pre-condition checks (fault injection, then market hours) and only
//! then asks the price source for a value.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::FaultInjector;
use crate::application::ports::PriceSource;
use crate::domain::error::ServiceError;
use crate::domain::market_hours::MarketHours;
use crate::domain::quote::PriceQuote;

/// Price lookup facade.
pub struct PriceService {
    source: Arc<dyn PriceSource>,
    hours: MarketHours,
    faults: Option<FaultInjector>,
}

impl std::fmt::Debug for PriceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceService")
            .field("hours", &self.hours)
            .field("fault_injection", &self.faults.is_some())
            .finish_non_exhaustive()
    }
}

impl PriceService {
    /// Create a service that is always open and never injects faults.
    #[must_use]
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            hours: MarketHours::AlwaysOpen,
            faults: None,
        }
    }

    /// Set the market-hours policy.
    #[must_use]
    pub const fn with_market_hours(mut self, hours: MarketHours) -> Self {
        self.hours = hours;
        self
    }

    /// Enable or disable the fault-injection cycle.
    #[must_use]
    pub fn with_fault_injection(mut self, enabled: bool) -> Self {
        self.faults = enabled.then(FaultInjector::new);
        self
    }

    /// Get the market-hours policy.
    #[must_use]
    pub const fn market_hours(&self) -> MarketHours {
        self.hours
    }

    /// Look up the current price for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns the pre-condition failure from [`Self::ensure_market_open`].
    pub fn quote(&self, symbol: &str) -> Result<PriceQuote, ServiceError> {
        self.quote_at(symbol, Utc::now())
    }

    /// Look up the price for `symbol` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns the pre-condition failure from [`Self::ensure_market_open`].
    pub fn quote_at(&self, symbol: &str, now: DateTime<Utc>) -> Result<PriceQuote, ServiceError> {
        self.ensure_market_open(now)?;

        let price = self.source.price_for(symbol);
        info!(symbol, %price, "Checking the price for {symbol}");

        Ok(PriceQuote::new(symbol, price, now))
    }

    /// Run the pre-condition checks for an operation at `now`.
    ///
    /// # Errors
    ///
    /// Returns a transient error from the fault-injection cycle when enabled,
    /// or `FailedPrecondition` when the market is closed.
    pub fn ensure_market_open(&self, now: DateTime<Utc>) -> Result<(), ServiceError> {
        if let Some(faults) = &self.faults {
            faults.check()?;
        }
        self.hours.ensure_open(now)
    }
}
