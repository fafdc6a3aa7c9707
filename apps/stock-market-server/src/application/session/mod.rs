//! Streaming Session Controllers
//!
//! One controller per RPC call shape. Controllers only see domain types,
//! the [`CallContext`] produced by the interceptor chain, and the ports;
//! the gRPC adapter owns the wire types and the response channels.
//!
//! | Shape | Controller | Terminates on |
//! |-------|------------|---------------|
//! | unary | [`unary::quote_once`] | first response or error |
//! | server streaming | [`server_streaming::stream_quotes`] | cap, deadline margin, cancellation, receiver dropped |
//! | client streaming | [`client_streaming::ingest_updates`] | inbound end, error, cancellation |
//! | bidirectional | [`bidirectional::exchange_quotes`] | inbound end, cancellation, receiver dropped |

use std::time::Duration;

use tokio::sync::mpsc;

use crate::domain::error::ServiceError;
use crate::domain::quote::PriceQuote;

/// Per-call correlation state.
pub mod context;

/// Request/response price lookup.
pub mod unary;

/// Timed push loop.
pub mod server_streaming;

/// Batched ingestion with durable flush.
pub mod client_streaming;

/// Order-preserving request/quote exchange.
pub mod bidirectional;

pub use context::{CallContext, CallKind};

/// Tunables shared by the streaming controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingLimits {
    /// Maximum quotes pushed by one server-streaming call.
    pub max_notifications: u32,
    /// Pause between consecutive pushes.
    pub push_interval: Duration,
    /// Pushing stops this long before the call deadline.
    pub deadline_margin: Duration,
    /// Accepted updates buffered before a durable flush.
    pub flush_threshold: usize,
}

impl Default for StreamingLimits {
    fn default() -> Self {
        Self {
            max_notifications: 10,
            push_interval: Duration::from_secs(2),
            deadline_margin: Duration::from_secs(3),
            flush_threshold: 2,
        }
    }
}

/// Item carried on an outbound quote channel.
pub type QuoteItem = Result<PriceQuote, ServiceError>;

/// Outbound side of a streaming call.
///
/// Wraps the channel the gRPC adapter drains into the response stream. A
/// failed push means the receiver is gone and the controller should stop.
#[derive(Debug, Clone)]
pub struct QuoteSink {
    tx: mpsc::Sender<QuoteItem>,
}

impl QuoteSink {
    /// Wrap an existing sender.
    #[must_use]
    pub const fn new(tx: mpsc::Sender<QuoteItem>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<QuoteItem>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Push a quote. Returns `false` if the receiver has gone away.
    pub async fn push(&self, quote: PriceQuote) -> bool {
        self.tx.send(Ok(quote)).await.is_ok()
    }

    /// Deliver a terminal error. Returns `false` if the receiver has gone away.
    pub async fn fail(&self, error: ServiceError) -> bool {
        self.tx.send(Err(error)).await.is_ok()
    }

    /// Whether the receiver has gone away.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
