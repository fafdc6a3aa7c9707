//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the service depends on.
//!
//! - `PriceSource`: Produces a price for a symbol
//! - `PriceLog`: Durable append-only store for accepted updates

mod price_log_port;
mod price_source_port;

pub use price_log_port::{PriceLog, StorageError};
pub use price_source_port::PriceSource;

#[cfg(test)]
pub use price_log_port::MockPriceLog;
#[cfg(test)]
pub use price_source_port::MockPriceSource;
