//! gRPC Stock Price Server
//!
//! Implements the `stock_market.v1.StockPrice` service.
//!
//! # Architecture
//!
//! Every inbound call, whatever its shape, goes through the same pipeline:
//!
//! 1. The interceptor chain logs the call, assigns a trace id and checks
//!    the authorization header
//! 2. Admitted calls get a `CallContext` carrying the trace id, deadline and
//!    cancellation token
//! 3. The session controller for the call shape runs against the price
//!    facade
//! 4. Failures become `google.rpc.Status` errors with the trace id attached
//! 5. On success the trailer layer mirrors the trace id into the trailers

pub mod interceptors;
pub mod server;
pub mod trailers;

// Allow clippy warnings and missing docs in generated code
#[allow(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
pub mod proto {
    pub mod stock_market {
        pub mod v1 {
            include!("proto/stock_market.v1.rs");
        }
    }
}

pub use interceptors::InterceptorChain;
pub use server::{CallStats, StockPriceService};
pub use trailers::TraceTrailerLayer;
