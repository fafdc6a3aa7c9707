//! Interceptor Chain Integration Tests
//!
//! Authorization, trace-id propagation and status metadata seen from a real
//! client, across call shapes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use tonic::{Code, Request};

use stock_market_server::proto::{StockRequest, UpdateStockPriceRequest};
use stock_market_server::{
    ErrorKind, MarketHours, PriceService, ServiceError, StatusReport, TRACE_ID_HEADER,
};

use common::{FixedPrice, authorized, fast_limits, setup_test_server, setup_with};

fn stock(symbol: &str) -> StockRequest {
    StockRequest {
        symbol: symbol.to_string(),
    }
}

#[tokio::test]
async fn test_missing_authorization_is_rejected() {
    let mut server = setup_test_server().await;

    let status = server
        .client
        .get_stock_price(Request::new(stock("PETR4")))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "Invalid token!");
    assert!(status.metadata().get(TRACE_ID_HEADER).is_some());

    let report = StatusReport::from_status(&status);
    assert!(!report.is_structured());
    assert_eq!(report.to_string(), "UNAUTHENTICATED: Invalid token!");

    server.handle.abort();
}

#[tokio::test]
async fn test_unauthorized_updates_have_no_side_effects() {
    let mut server = setup_test_server().await;

    let updates = vec![UpdateStockPriceRequest {
        symbol: "PETR4".to_string(),
        price: 10.0,
    }];
    let status = server
        .client
        .update_stock_prices_streamed(Request::new(tokio_stream::iter(updates)))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(server.log.flushes(), 0);

    server.handle.abort();
}

#[tokio::test]
async fn test_inbound_trace_id_is_echoed() {
    let mut server = setup_test_server().await;

    let mut request = authorized(stock("PETR4"));
    request
        .metadata_mut()
        .insert(TRACE_ID_HEADER, "trace-abc-123".parse().unwrap());

    let response = server.client.get_stock_price(request).await.unwrap();

    assert_eq!(
        response.metadata().get(TRACE_ID_HEADER).unwrap(),
        "trace-abc-123"
    );

    server.handle.abort();
}

#[tokio::test]
async fn test_trace_id_is_generated_fresh() {
    let mut server = setup_test_server().await;

    let first = server
        .client
        .get_stock_price(authorized(stock("PETR4")))
        .await
        .unwrap();
    let second = server
        .client
        .get_stock_price(authorized(stock("PETR4")))
        .await
        .unwrap();

    let first = first.metadata().get(TRACE_ID_HEADER).unwrap().to_str().unwrap();
    let second = second.metadata().get(TRACE_ID_HEADER).unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(first).is_ok());
    assert_ne!(first, second);

    server.handle.abort();
}

#[tokio::test]
async fn test_streaming_response_carries_trace_id() {
    let mut server = setup_test_server().await;

    let mut request = authorized(stock("VALE3"));
    request
        .metadata_mut()
        .insert(TRACE_ID_HEADER, "stream-trace".parse().unwrap());

    let response = server
        .client
        .get_stock_price_streamed(request)
        .await
        .unwrap();

    assert_eq!(
        response.metadata().get(TRACE_ID_HEADER).unwrap(),
        "stream-trace"
    );

    server.handle.abort();
}

#[tokio::test]
async fn test_streamed_trailers_carry_inbound_trace_id() {
    let mut server = setup_test_server().await;

    let mut request = authorized(stock("VALE3"));
    request
        .metadata_mut()
        .insert(TRACE_ID_HEADER, "trailer-trace".parse().unwrap());

    let mut stream = server
        .client
        .get_stock_price_streamed(request)
        .await
        .unwrap()
        .into_inner();
    while stream.message().await.unwrap().is_some() {}

    let trailers = stream.trailers().await.unwrap().unwrap();
    assert_eq!(trailers.get(TRACE_ID_HEADER).unwrap(), "trailer-trace");

    server.handle.abort();
}

#[tokio::test]
async fn test_exchange_trailers_carry_generated_trace_id() {
    let mut server = setup_test_server().await;

    let requests = vec![stock("PETR4"), stock("VALE3")];
    let response = server
        .client
        .exchange_stock_prices(authorized(tokio_stream::iter(requests)))
        .await
        .unwrap();
    let generated = response.metadata().get(TRACE_ID_HEADER).unwrap().clone();

    let mut stream = response.into_inner();
    while stream.message().await.unwrap().is_some() {}

    let trailers = stream.trailers().await.unwrap().unwrap();
    let trailer = trailers.get(TRACE_ID_HEADER).unwrap();
    assert_eq!(trailer, &generated);
    assert!(uuid::Uuid::parse_str(trailer.to_str().unwrap()).is_ok());

    server.handle.abort();
}

#[tokio::test]
async fn test_closed_market_reports_precondition() {
    // An empty-looking window far from any real clock: 00:00 to 00:00:01.
    let hours = MarketHours::Window {
        open: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        close: NaiveTime::from_hms_opt(0, 0, 1).unwrap(),
    };
    let prices =
        PriceService::new(Arc::new(FixedPrice(Decimal::ONE))).with_market_hours(hours);
    let mut server = setup_with(prices, fast_limits()).await;

    let mut request = authorized(stock("PETR4"));
    request
        .metadata_mut()
        .insert(TRACE_ID_HEADER, "closed-trace".parse().unwrap());

    let result = server.client.get_stock_price(request).await;

    // Skip when the test happens to run in the one open second.
    if let Err(status) = result {
        assert_eq!(status.code(), Code::FailedPrecondition);
        assert_eq!(
            status.metadata().get(TRACE_ID_HEADER).unwrap(),
            "closed-trace"
        );

        let error = ServiceError::from_status(&status);
        assert_eq!(error.kind(), ErrorKind::FailedPrecondition);
        assert_eq!(error.message(), "The stock market is closed!");
        assert_eq!(error.details().len(), 1);

        let report = StatusReport::from_status(&status);
        assert!(report.is_structured());
        assert!(report.to_string().contains("INVALID_OPERATION_TIME"));
    }

    server.handle.abort();
}
