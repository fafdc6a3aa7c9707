//! Price Source Port (Driven Port)
//!
//! Interface for producing a price for a stock symbol. The reference adapter
//! draws random prices; a market-data feed could be plugged in instead.

use rust_decimal::Decimal;

/// Port for price lookups.
#[cfg_attr(test, mockall::automock)]
pub trait PriceSource: Send + Sync {
    /// Produce the current price for `symbol`, with two fractional digits.
    fn price_for(&self, symbol: &str) -> Decimal;
}
