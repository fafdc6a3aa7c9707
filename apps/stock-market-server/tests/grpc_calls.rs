//! gRPC Call Shape Integration Tests
//!
//! Drives each of the four call shapes through a real server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

mod common;

use std::time::Duration;

use tokio::time::timeout;
use tonic::Code;

use stock_market_server::proto::{StockRequest, UpdateStockPriceRequest};
use stock_market_server::{ErrorDetail, ErrorKind, PriceService, ServiceError};

use common::{FixedPrice, authorized, fast_limits, setup_test_server, setup_with};

fn stock(symbol: &str) -> StockRequest {
    StockRequest {
        symbol: symbol.to_string(),
    }
}

fn update(symbol: &str, price: f64) -> UpdateStockPriceRequest {
    UpdateStockPriceRequest {
        symbol: symbol.to_string(),
        price,
    }
}

// =============================================================================
// Unary
// =============================================================================

#[tokio::test]
async fn test_get_stock_price() {
    let mut server = setup_test_server().await;

    let response = server
        .client
        .get_stock_price(authorized(stock("PETR4")))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.symbol, "PETR4");
    assert_eq!(response.price, 42.5);
    assert!(response.timestamp > 0);

    server.handle.abort();
}

// =============================================================================
// Server Streaming
// =============================================================================

#[tokio::test]
async fn test_streamed_quotes_stop_at_cap() {
    let mut server = setup_test_server().await;

    let mut stream = server
        .client
        .get_stock_price_streamed(authorized(stock("VALE3")))
        .await
        .unwrap()
        .into_inner();

    let mut received = Vec::new();
    while let Some(quote) = timeout(Duration::from_secs(2), stream.message())
        .await
        .expect("stream stalled")
        .unwrap()
    {
        received.push(quote);
    }

    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|q| q.symbol == "VALE3"));

    server.handle.abort();
}

#[tokio::test]
async fn test_streamed_quotes_respect_deadline_margin() {
    let mut server = setup_test_server().await;

    let mut request = authorized(stock("VALE3"));
    // Shorter than the 200ms margin: nothing may be pushed.
    request.set_timeout(Duration::from_millis(150));

    let mut stream = server
        .client
        .get_stock_price_streamed(request)
        .await
        .unwrap()
        .into_inner();

    let first = timeout(Duration::from_secs(2), stream.message())
        .await
        .expect("stream stalled")
        .unwrap();
    assert!(first.is_none());

    server.handle.abort();
}

#[tokio::test]
async fn test_streamed_fault_is_final_item() {
    let prices = PriceService::new(std::sync::Arc::new(FixedPrice(
        rust_decimal::Decimal::ONE,
    )))
    .with_fault_injection(true);
    let mut server = setup_with(prices, fast_limits()).await;

    let mut stream = server
        .client
        .get_stock_price_streamed(authorized(stock("VALE3")))
        .await
        .unwrap()
        .into_inner();

    let status = timeout(Duration::from_secs(2), stream.message())
        .await
        .expect("stream stalled")
        .unwrap_err();
    assert_eq!(status.code(), Code::Unavailable);
    assert_eq!(status.message(), "Unavailable Service!");

    server.handle.abort();
}

// =============================================================================
// Client Streaming
// =============================================================================

#[tokio::test]
async fn test_update_prices_counts_and_flushes() {
    let mut server = setup_test_server().await;

    let updates = vec![
        update("PETR4", 30.25),
        update("VALE3", 61.0),
        update("ITUB4", 25.5),
        update("MGLU3", 2.1),
        update("BBAS3", 48.0),
    ];

    let response = server
        .client
        .update_stock_prices_streamed(authorized(tokio_stream::iter(updates)))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.count, 5);
    assert_eq!(response.message, "5 updated stocks!");

    let batches = server.log.batches();
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(batches[0][0], r#"{"symbol":"PETR4","price":"30.25"}"#);

    server.handle.abort();
}

#[tokio::test]
async fn test_update_prices_empty_stream_flushes_once() {
    let mut server = setup_test_server().await;

    let response = server
        .client
        .update_stock_prices_streamed(authorized(tokio_stream::iter(Vec::<
            UpdateStockPriceRequest,
        >::new())))
        .await
        .unwrap()
        .into_inner();

    assert_eq!(response.count, 0);
    assert_eq!(server.log.flushes(), 1);
    assert!(server.log.lines().is_empty());

    server.handle.abort();
}

#[tokio::test]
async fn test_invalid_update_carries_all_violations() {
    let mut server = setup_test_server().await;

    let updates = vec![update("PETR4", 30.0), update("AB", -1.0)];

    let status = server
        .client
        .update_stock_prices_streamed(authorized(tokio_stream::iter(updates)))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);

    let error = ServiceError::from_status(&status);
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);
    assert_eq!(error.message(), "Invalid Request!");
    assert_eq!(
        error.details(),
        &[
            ErrorDetail::field("price", "The stock price cannot be less than zero."),
            ErrorDetail::field("symbol", "The stock code must have 4 or 5 characters."),
        ]
    );

    // The valid first update never reached a full batch.
    assert_eq!(server.log.flushes(), 0);

    server.handle.abort();
}

// =============================================================================
// Bidirectional Streaming
// =============================================================================

#[tokio::test]
async fn test_exchange_preserves_order() {
    let mut server = setup_test_server().await;

    let symbols = ["PETR4", "VALE3", "ITUB4", "MGLU3"];
    let requests: Vec<StockRequest> = symbols.iter().map(|s| stock(s)).collect();

    let mut stream = server
        .client
        .exchange_stock_prices(authorized(tokio_stream::iter(requests)))
        .await
        .unwrap()
        .into_inner();

    let mut received = Vec::new();
    while let Some(quote) = timeout(Duration::from_secs(2), stream.message())
        .await
        .expect("stream stalled")
        .unwrap()
    {
        received.push(quote.symbol);
    }

    assert_eq!(received, symbols);

    server.handle.abort();
}
