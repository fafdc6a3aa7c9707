//! Price Log Adapters
//!
//! Implementations of the `PriceLog` port.
//!
//! - `FilePriceLog`: Newline-delimited JSON appended to a local file
//! - `MemoryPriceLog`: Keeps every appended batch in memory (tests)

mod file;
mod memory;

pub use file::FilePriceLog;
pub use memory::MemoryPriceLog;
