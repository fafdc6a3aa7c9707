//! Application Services
//!
//! Services that orchestrate domain logic and coordinate between ports.
//!
//! - `PriceService`: Single-call price lookup shared by every RPC
//! - `FaultInjector`: Deterministic failure cycle for exercising retries

mod fault_injection;
mod price_service;

pub use fault_injection::FaultInjector;
pub use price_service::PriceService;
