//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the price facade, the per-call-shape session
//! controllers and the port interfaces they depend on.

/// Port interfaces for external systems (price source, append log).
pub mod ports;

/// Application services (price facade, fault injection).
pub mod services;

/// Streaming session controllers, one per RPC call shape.
pub mod session;
