//! gRPC Server Implementation
//!
//! Implements the `StockPrice` gRPC service. Every method runs the same
//! interceptor chain, then hands the admitted call to the session controller
//! for its shape. Streaming controllers run on their own task and push into
//! a channel that backs the response stream; dropping the response stream
//! cancels the call.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::StreamExt;
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::DropGuard;
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status, Streaming};
use tracing::Instrument;

use super::interceptors::{
    Admitted, InboundCall, InterceptorChain, merge_metadata, with_metadata,
};
use super::proto::stock_market::v1::{
    StockRequest, StockResponse, UpdateStockPriceRequest, UpdateStockPricesResponse,
    stock_price_server::{SERVICE_NAME, StockPrice, StockPriceServer},
};
use crate::application::ports::PriceLog;
use crate::application::services::PriceService;
use crate::application::session::{
    CallContext, QuoteItem, QuoteSink, StreamingLimits, bidirectional, client_streaming,
    server_streaming, unary,
};
use crate::domain::error::ServiceError;
use crate::domain::quote::{PriceQuote, PriceUpdate};
use crate::infrastructure::metrics::{self, RpcMethod};
use crate::infrastructure::telemetry::rpc_span;

// =============================================================================
// Type Aliases
// =============================================================================

type RpcResult<T> = Result<Response<T>, Status>;
type BoxedStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

/// Buffered quotes per streaming call.
const QUOTE_CHANNEL_CAPACITY: usize = 16;

// =============================================================================
// Call Statistics
// =============================================================================

/// Live call counters, shared with the health endpoint.
#[derive(Debug, Default)]
pub struct CallStats {
    active: AtomicU64,
    total: AtomicU64,
}

impl CallStats {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Calls currently in flight.
    #[must_use]
    pub fn active(&self) -> u64 {
        self.active.load(Ordering::Relaxed)
    }

    /// Calls admitted since startup.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    fn begin(self: &Arc<Self>) -> ActiveCall {
        self.total.fetch_add(1, Ordering::Relaxed);
        let active = self.active.fetch_add(1, Ordering::Relaxed) + 1;
        metrics::set_active_calls(active);
        ActiveCall {
            stats: Arc::clone(self),
        }
    }
}

/// Marks a call in flight until dropped.
#[derive(Debug)]
struct ActiveCall {
    stats: Arc<CallStats>,
}

impl Drop for ActiveCall {
    fn drop(&mut self) {
        let active = self.stats.active.fetch_sub(1, Ordering::Relaxed) - 1;
        metrics::set_active_calls(active);
    }
}

// =============================================================================
// Response Stream
// =============================================================================

/// Response stream backed by a controller's quote channel.
///
/// Converts domain items to wire messages and attaches the call's outbound
/// metadata to a terminal error. Dropping it cancels the call.
struct QuoteStream {
    inner: ReceiverStream<QuoteItem>,
    method: RpcMethod,
    outbound: MetadataMap,
    _cancel_on_drop: DropGuard,
    _active: ActiveCall,
}

impl QuoteStream {
    fn convert(&self, item: QuoteItem) -> Result<StockResponse, Status> {
        match item {
            Ok(quote) => {
                metrics::record_quotes_emitted(self.method, 1);
                Ok(quote_to_proto(&quote))
            }
            Err(error) => {
                metrics::record_rejection(self.method, error.kind());
                Err(with_metadata(error.to_status(), &self.outbound))
            }
        }
    }
}

impl Stream for QuoteStream {
    type Item = Result<StockResponse, Status>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        this.inner
            .poll_next_unpin(cx)
            .map(|item| item.map(|item| this.convert(item)))
    }
}

// =============================================================================
// Service Implementation
// =============================================================================

/// gRPC stock price service.
pub struct StockPriceService {
    prices: Arc<PriceService>,
    log: Arc<dyn PriceLog>,
    chain: Arc<InterceptorChain>,
    limits: StreamingLimits,
    stats: Arc<CallStats>,
}

impl std::fmt::Debug for StockPriceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockPriceService")
            .field("prices", &self.prices)
            .field("chain", &self.chain)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl StockPriceService {
    /// Create a service with default streaming limits.
    #[must_use]
    pub fn new(prices: Arc<PriceService>, log: Arc<dyn PriceLog>, chain: InterceptorChain) -> Self {
        Self {
            prices,
            log,
            chain: Arc::new(chain),
            limits: StreamingLimits::default(),
            stats: CallStats::new(),
        }
    }

    /// Override the streaming limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: StreamingLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the call counters.
    #[must_use]
    pub fn stats(&self) -> Arc<CallStats> {
        Arc::clone(&self.stats)
    }

    /// Wrap in the generated tonic server.
    #[must_use]
    pub fn into_server(self) -> StockPriceServer<Self> {
        StockPriceServer::new(self)
    }

    fn admit<T>(&self, method: RpcMethod, request: &Request<T>) -> Result<Admitted, Status> {
        let path = format!("/{SERVICE_NAME}/{}", method.as_str());
        let call = InboundCall::new(method.kind(), &path, request.metadata());

        match self.chain.admit(&call) {
            Ok(admitted) => {
                metrics::record_call(method);
                Ok(admitted)
            }
            Err(rejected) => {
                metrics::record_rejection(method, rejected.error.kind());
                Err(rejected.into_status())
            }
        }
    }
}

#[tonic::async_trait]
impl StockPrice for StockPriceService {
    type GetStockPriceStreamedStream = BoxedStream<StockResponse>;
    type ExchangeStockPricesStream = BoxedStream<StockResponse>;

    async fn get_stock_price(&self, request: Request<StockRequest>) -> RpcResult<StockResponse> {
        let method = RpcMethod::GetStockPrice;
        let Admitted { context, outbound } = self.admit(method, &request)?;
        let _active = self.stats.begin();

        let symbol = request.into_inner().symbol;
        let outcome =
            rpc_span(&context).in_scope(|| unary::quote_once(&context, &self.prices, &symbol));
        match outcome {
            Ok(quote) => {
                metrics::record_quotes_emitted(method, 1);
                Ok(respond(quote_to_proto(&quote), &outbound))
            }
            Err(error) => Err(reject(method, &error, &outbound)),
        }
    }

    async fn get_stock_price_streamed(
        &self,
        request: Request<StockRequest>,
    ) -> RpcResult<Self::GetStockPriceStreamedStream> {
        let method = RpcMethod::GetStockPriceStreamed;
        let Admitted { context, outbound } = self.admit(method, &request)?;
        let active = self.stats.begin();

        let symbol = request.into_inner().symbol;
        let (sink, quotes) = QuoteSink::channel(QUOTE_CHANNEL_CAPACITY);
        let prices = Arc::clone(&self.prices);
        let limits = self.limits;
        let ctx = context.clone();
        let span = rpc_span(&context);

        tokio::spawn(
            async move {
                let outcome =
                    server_streaming::stream_quotes(&ctx, &prices, &limits, &symbol, &sink).await;
                if let Err(error) = outcome {
                    deliver_failure(&sink, error).await;
                }
            }
            .instrument(span),
        );

        Ok(stream_response(method, &context, outbound, quotes, active))
    }

    async fn update_stock_prices_streamed(
        &self,
        request: Request<Streaming<UpdateStockPriceRequest>>,
    ) -> RpcResult<UpdateStockPricesResponse> {
        let method = RpcMethod::UpdateStockPricesStreamed;
        let Admitted { context, outbound } = self.admit(method, &request)?;
        let _active = self.stats.begin();
        // The handler future is dropped if the caller goes away.
        let _cancel_on_drop = context.cancellation().drop_guard();

        let inbound = Box::pin(request.into_inner().map(|item| {
            item.map(|update| PriceUpdate::new(update.symbol, update.price))
                .map_err(|status| ServiceError::from_status(&status))
        }));

        let outcome = client_streaming::ingest_updates(
            &context,
            &self.prices,
            self.log.as_ref(),
            &self.limits,
            inbound,
        )
        .instrument(rpc_span(&context))
        .await;

        match outcome {
            Ok(summary) => {
                metrics::record_updates_accepted(u64::from(summary.accepted));
                let response = UpdateStockPricesResponse {
                    count: summary.accepted,
                    message: summary.message(),
                };
                Ok(respond(response, &outbound))
            }
            Err(error) => Err(reject(method, &error, &outbound)),
        }
    }

    async fn exchange_stock_prices(
        &self,
        request: Request<Streaming<StockRequest>>,
    ) -> RpcResult<Self::ExchangeStockPricesStream> {
        let method = RpcMethod::ExchangeStockPrices;
        let Admitted { context, outbound } = self.admit(method, &request)?;
        let active = self.stats.begin();

        let inbound = Box::pin(request.into_inner().map(|item| {
            item.map(|request| request.symbol)
                .map_err(|status| ServiceError::from_status(&status))
        }));
        let (sink, quotes) = QuoteSink::channel(QUOTE_CHANNEL_CAPACITY);
        let prices = Arc::clone(&self.prices);
        let ctx = context.clone();
        let span = rpc_span(&context);

        tokio::spawn(
            async move {
                let outcome = bidirectional::exchange_quotes(&ctx, &prices, inbound, &sink).await;
                if let Err(error) = outcome {
                    deliver_failure(&sink, error).await;
                }
            }
            .instrument(span),
        );

        Ok(stream_response(method, &context, outbound, quotes, active))
    }
}

// =============================================================================
// Conversion Helpers
// =============================================================================

fn quote_to_proto(quote: &PriceQuote) -> StockResponse {
    StockResponse {
        symbol: quote.symbol.clone(),
        price: quote.price_f64(),
        timestamp: quote.timestamp,
    }
}

fn stream_response(
    method: RpcMethod,
    context: &CallContext,
    outbound: MetadataMap,
    quotes: tokio::sync::mpsc::Receiver<QuoteItem>,
    active: ActiveCall,
) -> Response<BoxedStream<StockResponse>> {
    let headers = outbound.clone();
    let stream = QuoteStream {
        inner: ReceiverStream::new(quotes),
        method,
        outbound,
        _cancel_on_drop: context.cancellation().drop_guard(),
        _active: active,
    };
    respond(Box::pin(stream) as BoxedStream<StockResponse>, &headers)
}

fn respond<T>(body: T, outbound: &MetadataMap) -> Response<T> {
    let mut response = Response::new(body);
    merge_metadata(response.metadata_mut(), outbound);
    response
}

fn reject(method: RpcMethod, error: &ServiceError, outbound: &MetadataMap) -> Status {
    metrics::record_rejection(method, error.kind());
    tracing::warn!(
        method = method.as_str(),
        code = %error.kind(),
        reason = error.message(),
        "Call failed"
    );
    with_metadata(error.to_status(), outbound)
}

async fn deliver_failure(sink: &QuoteSink, error: ServiceError) {
    let code = error.kind();
    if !sink.fail(error).await {
        tracing::debug!(%code, "Receiver gone, terminal error dropped");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::ports::MockPriceSource;
    use crate::domain::error::ErrorKind;
    use crate::infrastructure::grpc::interceptors::TRACE_ID_HEADER;
    use crate::infrastructure::storage::MemoryPriceLog;

    fn service() -> StockPriceService {
        let mut source = MockPriceSource::new();
        source
            .expect_price_for()
            .returning(|_| Decimal::new(12_345, 2));
        let prices = Arc::new(PriceService::new(Arc::new(source)));
        StockPriceService::new(
            prices,
            Arc::new(MemoryPriceLog::new()),
            InterceptorChain::standard(),
        )
    }

    fn authorized<T>(body: T) -> Request<T> {
        let mut request = Request::new(body);
        request
            .metadata_mut()
            .insert("authorization", "jwt-token".parse().unwrap());
        request
    }

    #[test]
    fn quote_conversion() {
        let quote = PriceQuote::new("PETR4", Decimal::new(4_250, 2), Utc::now());
        let proto = quote_to_proto(&quote);
        assert_eq!(proto.symbol, "PETR4");
        assert!((proto.price - 42.5).abs() < 1e-9);
        assert_eq!(proto.timestamp, quote.timestamp);
    }

    #[tokio::test]
    async fn unary_call_echoes_trace_id() {
        let service = service();
        let mut request = authorized(StockRequest {
            symbol: "PETR4".to_string(),
        });
        request
            .metadata_mut()
            .insert(TRACE_ID_HEADER, "trace-77".parse().unwrap());

        let response = service.get_stock_price(request).await.unwrap();

        assert_eq!(response.metadata().get(TRACE_ID_HEADER).unwrap(), "trace-77");
        assert_eq!(response.get_ref().symbol, "PETR4");
        assert!((response.get_ref().price - 123.45).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unauthenticated_call_never_counts_as_active() {
        let service = service();
        let request = Request::new(StockRequest {
            symbol: "PETR4".to_string(),
        });

        let status = service.get_stock_price(request).await.unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert!(status.metadata().get(TRACE_ID_HEADER).is_some());
        assert_eq!(service.stats().total(), 0);
    }

    #[tokio::test]
    async fn unary_call_tracks_stats() {
        let service = service();
        let request = authorized(StockRequest {
            symbol: "VALE3".to_string(),
        });

        service.get_stock_price(request).await.unwrap();

        assert_eq!(service.stats().total(), 1);
        assert_eq!(service.stats().active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_stream_cancels_call() {
        let service = service();
        let request = authorized(StockRequest {
            symbol: "PETR4".to_string(),
        });

        let mut stream = service
            .get_stock_price_streamed(request)
            .await
            .unwrap()
            .into_inner();
        assert!(stream.next().await.unwrap().is_ok());
        assert_eq!(service.stats().active(), 1);

        drop(stream);
        assert_eq!(service.stats().active(), 0);
    }

    #[tokio::test]
    async fn terminal_error_reaches_live_receiver() {
        let (sink, mut quotes) = QuoteSink::channel(1);

        deliver_failure(&sink, ServiceError::new(ErrorKind::Unavailable, "down")).await;

        let error = quotes.recv().await.unwrap().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn terminal_error_after_receiver_gone_is_dropped() {
        let (sink, quotes) = QuoteSink::channel(1);
        drop(quotes);

        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            deliver_failure(&sink, ServiceError::new(ErrorKind::Unavailable, "down")),
        )
        .await
        .unwrap();
        assert!(sink.is_closed());
    }
}
