//! Stock Market Server Binary
//!
//! Starts the stock price gRPC service and its health endpoint.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin stock-market-server
//! ```
//!
//! # Environment Variables
//!
//! - `STOCK_MARKET_GRPC_PORT`: gRPC server port (default: 5251)
//! - `STOCK_MARKET_HEALTH_PORT`: Health check HTTP port (default: 8081)
//! - `STOCK_MARKET_PRICE_LOG`: Durable price log path (default: stockprices.txt)
//! - `STOCK_MARKET_HOURS_ENFORCED`: Enforce the trading window (default: false)
//! - `STOCK_MARKET_OPEN` / `STOCK_MARKET_CLOSE`: Trading window, UTC `HH:MM`
//!   (default: 09:30 / 17:00)
//! - `STOCK_MARKET_FAULT_INJECTION`: Fail four of every five price checks
//!   (default: false)
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: true)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4318>)
//! - `OTEL_SERVICE_NAME`: Service name (default: stock-market-server)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use stock_market_server::infrastructure::health::{HealthServer, HealthServerState};
use stock_market_server::infrastructure::telemetry;
use stock_market_server::{
    FilePriceLog, InterceptorChain, PriceService, RandomPriceSource, ServerConfig,
    StockPriceService, TraceTrailerLayer, init_metrics,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    // Initialize telemetry (OpenTelemetry + tracing)
    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting Stock Market Server");

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics();

    let config = ServerConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    // Price facade
    let prices = Arc::new(
        PriceService::new(Arc::new(RandomPriceSource))
            .with_market_hours(config.market.market_hours())
            .with_fault_injection(config.market.fault_injection),
    );

    // Durable price log
    let price_log = Arc::new(FilePriceLog::new(&config.storage.price_log_path));

    // Initialize gRPC service
    let grpc_service =
        StockPriceService::new(prices, price_log, InterceptorChain::standard());
    let call_stats = grpc_service.stats();

    // Initialize health server
    let health_state = Arc::new(
        HealthServerState::new(
            env!("CARGO_PKG_VERSION").to_string(),
            call_stats,
            shutdown_token.clone(),
        )
        .with_fault_injection(config.market.fault_injection),
    );
    let health_server = HealthServer::new(
        config.server.health_port,
        health_state,
        shutdown_token.clone(),
    );

    // Spawn health server
    tokio::spawn(async move {
        if let Err(e) = health_server.run().await {
            tracing::error!(error = %e, "Health server error");
        }
    });

    // Spawn gRPC server
    let grpc_addr = SocketAddr::from(([0, 0, 0, 0], config.server.grpc_port));
    let grpc_shutdown = shutdown_token.clone();

    let grpc_task = tokio::spawn(async move {
        tracing::info!(addr = %grpc_addr, "gRPC server listening");
        if let Err(e) = Server::builder()
            .layer(TraceTrailerLayer)
            .add_service(grpc_service.into_server())
            .serve_with_shutdown(grpc_addr, grpc_shutdown.cancelled())
            .await
        {
            tracing::error!(error = %e, "gRPC server error");
        }
        tracing::info!("gRPC server stopped");
    });

    tracing::info!("Stock market server ready");

    await_shutdown(shutdown_token).await;

    if tokio::time::timeout(SHUTDOWN_TIMEOUT, grpc_task).await.is_err() {
        tracing::warn!("Calls still open after shutdown timeout, exiting anyway");
    }

    tracing::info!("Stock market server stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &ServerConfig) {
    tracing::info!(
        grpc_port = config.server.grpc_port,
        health_port = config.server.health_port,
        price_log = %config.storage.price_log_path.display(),
        hours_enforced = config.market.hours_enforced,
        fault_injection = config.market.fault_injection,
        "Configuration loaded"
    );
    if config.market.hours_enforced {
        tracing::debug!(
            open = %config.market.open,
            close = %config.market.close,
            "Trading window (UTC)"
        );
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
