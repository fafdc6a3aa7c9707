#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Stock Market Server - Stock Price gRPC Service
//!
//! A gRPC service that quotes stock prices over the four call shapes:
//! unary, server streaming, client streaming and bidirectional streaming.
//! Every call passes a logging, trace-id and authorization interceptor
//! chain; failures carry a structured `google.rpc.Status`.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Quotes, validation rules, market hours and the error model
//!   - `error`: `ServiceError`, error kinds and details
//!   - `quote`: Price quotes and price updates
//!   - `market_hours`: Trading window policy
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Price source and durable price log
//!   - `services`: Price facade and fault injection
//!   - `session`: Call context and the per-shape session controllers
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `grpc`: tonic server and interceptor chain
//!   - `storage`: File and in-memory price logs
//!   - `pricing`: Random price source
//!   - `config`: Environment configuration
//!   - `health`: Health check HTTP endpoint
//!
//! # Call Flow
//!
//! ```text
//! client ──► interceptors ──► CallContext ──► session controller ──► PriceService
//!   ▲          (log, trace,                       │                      │
//!   │           auth)                             ▼                      ▼
//!   └──────────── responses / Status ◄──── QuoteSink / summary     PriceSource, PriceLog
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Quotes, validation and the error model.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::error::{ErrorDetail, ErrorKind, RetryAdvice, ServiceError, StatusReport};
pub use domain::market_hours::MarketHours;
pub use domain::quote::{AcceptedUpdate, PriceQuote, PriceUpdate};

// Application
pub use application::ports::{PriceLog, PriceSource, StorageError};
pub use application::services::PriceService;
pub use application::session::{CallContext, CallKind, StreamingLimits};

// Infrastructure config
pub use infrastructure::config::{
    ConfigError, MarketSettings, ServerConfig, ServerSettings, StorageSettings,
};

// Health server
pub use infrastructure::health::{HealthServer, HealthServerError, HealthServerState};

// gRPC server (for integration tests)
pub use infrastructure::grpc::{
    interceptors::{AUTHORIZATION_HEADER, InterceptorChain, TRACE_ID_HEADER},
    proto::stock_market::v1 as proto,
    server::{CallStats, StockPriceService},
    trailers::TraceTrailerLayer,
};

// Adapters
pub use infrastructure::pricing::RandomPriceSource;
pub use infrastructure::storage::{FilePriceLog, MemoryPriceLog};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
