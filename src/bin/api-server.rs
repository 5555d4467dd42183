//! Screenix API Server
//!
//! HTTP gateway over the screening engine: submits jobs, serves
//! status/results/history, exports result files. Job state lives in
//! the in-memory job store owned by this process.

use dotenvy::dotenv;
use screenix::config;
use screenix::core::http::{create_router, AppState, HealthStatus};
use screenix::jobs::orchestrator::ScreeningOrchestrator;
use screenix::jobs::store::InMemoryJobStore;
use screenix::logging;
use screenix::metrics::Metrics;
use screenix::services::rest_provider::RestMarketDataProvider;
use screenix::services::symbols::StaticSymbolProvider;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();
    logging::init_logging();

    let port = config::get_port();
    let environment = config::get_environment();
    let market_data_url = config::get_market_data_url();

    info!("Starting Screenix API Server");
    info!(environment = %environment, "Environment");
    info!(market_data_url = %market_data_url, "Market data source");

    let metrics = Arc::new(Metrics::new()?);
    let store = Arc::new(InMemoryJobStore::new());
    let symbols = Arc::new(StaticSymbolProvider::new());
    let market_data = Arc::new(RestMarketDataProvider::new(market_data_url));

    let orchestrator = Arc::new(
        ScreeningOrchestrator::new(store, symbols, market_data).with_metrics(metrics.clone()),
    );

    let state = AppState {
        orchestrator,
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port = port, "HTTP server listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutting down API server...");
        })
        .await?;

    info!("API server stopped");
    Ok(())
}
