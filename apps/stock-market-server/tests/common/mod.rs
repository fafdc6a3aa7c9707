//! Shared test server setup.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tonic::Request;
use tonic::transport::{Channel, Server};

use stock_market_server::proto::stock_price_client::StockPriceClient;
use stock_market_server::{
    AUTHORIZATION_HEADER, InterceptorChain, MemoryPriceLog, PriceService, PriceSource,
    StockPriceService, StreamingLimits, TraceTrailerLayer,
};

/// Price source that always quotes the same price.
pub struct FixedPrice(pub Decimal);

impl PriceSource for FixedPrice {
    fn price_for(&self, _symbol: &str) -> Decimal {
        self.0
    }
}

/// Handles to a running test server.
pub struct TestServer {
    pub client: StockPriceClient<Channel>,
    pub log: Arc<MemoryPriceLog>,
    pub handle: tokio::task::JoinHandle<()>,
}

/// Streaming limits short enough for wall-clock tests.
pub fn fast_limits() -> StreamingLimits {
    StreamingLimits {
        max_notifications: 3,
        push_interval: Duration::from_millis(20),
        deadline_margin: Duration::from_millis(200),
        flush_threshold: 2,
    }
}

/// Start a server with a fixed price of 42.50 and fast limits.
pub async fn setup_test_server() -> TestServer {
    let prices = PriceService::new(Arc::new(FixedPrice(Decimal::new(4_250, 2))));
    setup_with(prices, fast_limits()).await
}

/// Start a test gRPC server on a random port and return the client.
pub async fn setup_with(prices: PriceService, limits: StreamingLimits) -> TestServer {
    let log = Arc::new(MemoryPriceLog::new());
    let service = StockPriceService::new(
        Arc::new(prices),
        Arc::clone(&log) as Arc<dyn stock_market_server::PriceLog>,
        InterceptorChain::standard(),
    )
    .with_limits(limits);

    // Find an available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Start gRPC server
    let handle = tokio::spawn(async move {
        Server::builder()
            .layer(TraceTrailerLayer)
            .add_service(service.into_server())
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    // Give server time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = StockPriceClient::connect(format!("http://{addr}"))
        .await
        .unwrap();

    TestServer {
        client,
        log,
        handle,
    }
}

/// Wrap a message with an authorization header.
pub fn authorized<T>(message: T) -> Request<T> {
    let mut request = Request::new(message);
    request
        .metadata_mut()
        .insert(AUTHORIZATION_HEADER, "Bearer test-token".parse().unwrap());
    request
}
