//! Domain Layer - Core pricing types and business rules.
//!
//! This layer contains the error taxonomy, price quotes and updates, and
//! the market-hours policy. Nothing here performs I/O.

/// Structured error model with gRPC status mapping.
pub mod error;

/// Market-hours policy.
pub mod market_hours;

/// Price quotes, updates and update validation.
pub mod quote;
