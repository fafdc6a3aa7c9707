//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// gRPC server implementation and interceptors.
pub mod grpc;

/// Configuration loading.
pub mod config;

/// Health check HTTP endpoint.
pub mod health;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Price source adapters.
pub mod pricing;

/// Durable price log adapters.
pub mod storage;

/// OpenTelemetry tracing integration.
pub mod telemetry;
