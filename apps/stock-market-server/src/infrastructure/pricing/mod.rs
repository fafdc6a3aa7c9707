//! Random price source.

use rand::Rng;
use rust_decimal::Decimal;

use crate::application::ports::PriceSource;

/// Lowest generated price, in cents.
const MIN_CENTS: i64 = 5_000;

/// Highest generated price, in cents.
const MAX_CENTS: i64 = 30_000;

/// Draws a uniform price in `[50.00, 300.00]` with cent precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPriceSource;

impl RandomPriceSource {
    /// Create a random source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PriceSource for RandomPriceSource {
    fn price_for(&self, _symbol: &str) -> Decimal {
        let cents = rand::rng().random_range(MIN_CENTS..=MAX_CENTS);
        Decimal::new(cents, 2)
    }
}
