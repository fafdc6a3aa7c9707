//! Prometheus Metrics Module
//!
//! Exposes application metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Calls**: Admitted calls and interceptor/handler rejections per method
//! - **Quotes**: Quotes pushed to callers per method
//! - **Ingestion**: Accepted price updates and durable batch flushes
//! - **Latency**: Durable flush duration
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the health server port.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::application::session::CallKind;
use crate::domain::error::ErrorKind;

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if the recorder cannot be installed.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let builder = PrometheusBuilder::new();
            let handle = builder
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    // Call counters
    describe_counter!(
        "stock_market_calls_total",
        "Total calls admitted by the interceptor chain"
    );
    describe_counter!(
        "stock_market_call_rejections_total",
        "Total calls failed, by status code"
    );

    // Active calls
    describe_gauge!("stock_market_active_calls", "Number of calls in flight");

    // Streaming
    describe_counter!(
        "stock_market_quotes_emitted_total",
        "Total quotes pushed to callers"
    );
    describe_counter!(
        "stock_market_updates_accepted_total",
        "Total price updates accepted and persisted"
    );
    describe_counter!(
        "stock_market_batches_flushed_total",
        "Total batches appended to the price log"
    );

    // Latency histograms
    describe_histogram!(
        "stock_market_flush_seconds",
        "Time to append and sync one batch"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Metric labels for RPC methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    /// `GetStockPrice`.
    GetStockPrice,
    /// `GetStockPriceStreamed`.
    GetStockPriceStreamed,
    /// `UpdateStockPricesStreamed`.
    UpdateStockPricesStreamed,
    /// `ExchangeStockPrices`.
    ExchangeStockPrices,
}

impl RpcMethod {
    /// Short method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetStockPrice => "GetStockPrice",
            Self::GetStockPriceStreamed => "GetStockPriceStreamed",
            Self::UpdateStockPricesStreamed => "UpdateStockPricesStreamed",
            Self::ExchangeStockPrices => "ExchangeStockPrices",
        }
    }

    /// Call shape of the method.
    #[must_use]
    pub const fn kind(self) -> CallKind {
        match self {
            Self::GetStockPrice => CallKind::Unary,
            Self::GetStockPriceStreamed => CallKind::ServerStreaming,
            Self::UpdateStockPricesStreamed => CallKind::ClientStreaming,
            Self::ExchangeStockPrices => CallKind::DuplexStreaming,
        }
    }
}

/// Record a call admitted by the interceptor chain.
pub fn record_call(method: RpcMethod) {
    counter!(
        "stock_market_calls_total",
        "method" => method.as_str(),
        "kind" => method.kind().as_str()
    )
    .increment(1);
}

/// Record a failed call.
pub fn record_rejection(method: RpcMethod, code: ErrorKind) {
    counter!(
        "stock_market_call_rejections_total",
        "method" => method.as_str(),
        "code" => code.as_str()
    )
    .increment(1);
}

/// Update the in-flight call count.
#[allow(clippy::cast_precision_loss)]
pub fn set_active_calls(count: u64) {
    gauge!("stock_market_active_calls").set(count as f64);
}

/// Record quotes pushed to a caller.
pub fn record_quotes_emitted(method: RpcMethod, count: u64) {
    counter!(
        "stock_market_quotes_emitted_total",
        "method" => method.as_str()
    )
    .increment(count);
}

/// Record accepted price updates.
pub fn record_updates_accepted(count: u64) {
    counter!("stock_market_updates_accepted_total").increment(count);
}

/// Record one batch appended to the price log.
pub fn record_batch_flushed(duration: Duration) {
    counter!("stock_market_batches_flushed_total").increment(1);
    histogram!("stock_market_flush_seconds").record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_method_as_str() {
        assert_eq!(RpcMethod::GetStockPrice.as_str(), "GetStockPrice");
        assert_eq!(
            RpcMethod::GetStockPriceStreamed.as_str(),
            "GetStockPriceStreamed"
        );
        assert_eq!(
            RpcMethod::UpdateStockPricesStreamed.as_str(),
            "UpdateStockPricesStreamed"
        );
        assert_eq!(RpcMethod::ExchangeStockPrices.as_str(), "ExchangeStockPrices");
    }

    #[test]
    fn rpc_method_kind() {
        assert_eq!(RpcMethod::GetStockPrice.kind(), CallKind::Unary);
        assert_eq!(
            RpcMethod::ExchangeStockPrices.kind(),
            CallKind::DuplexStreaming
        );
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_call(RpcMethod::GetStockPrice);
        record_rejection(RpcMethod::GetStockPrice, ErrorKind::Unauthenticated);
        record_batch_flushed(Duration::from_millis(3));
    }
}
