//! Screenix one-shot screener
//!
//! Runs a single screening job from the command line and prints the
//! matches. Configured through environment variables:
//!
//! - `SYMBOLS`: comma-separated symbol list (overrides the index)
//! - `INDEX_TYPE`: universe selector code (default "1" = Nifty 50)
//! - `CRITERIA`: screening criteria code (default "5" = RSI)
//! - `RSI_MIN` / `RSI_MAX`: RSI bounds for criteria "5"
//! - `MARKET_DATA_URL`: candle source consumed by the REST provider

use dotenvy::dotenv;
use screenix::config;
use screenix::jobs::orchestrator::ScreeningOrchestrator;
use screenix::jobs::store::InMemoryJobStore;
use screenix::jobs::types::JobStatus;
use screenix::logging;
use screenix::models::{IndexType, ScreeningCriteria, ScreeningRequest, StockResult};
use screenix::services::rest_provider::RestMarketDataProvider;
use screenix::services::symbols::StaticSymbolProvider;
use std::env;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let index_type = env::var("INDEX_TYPE")
        .ok()
        .and_then(|code| IndexType::from_code(&code))
        .unwrap_or(IndexType::Nifty50);
    let criteria = env::var("CRITERIA")
        .ok()
        .and_then(|code| ScreeningCriteria::from_code(&code))
        .unwrap_or(ScreeningCriteria::RsiScreening);

    let mut request = ScreeningRequest::new(index_type, criteria);
    if let Ok(symbols) = env::var("SYMBOLS") {
        request.stock_codes = symbols
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    request.rsi_min = env::var("RSI_MIN").ok().and_then(|v| v.parse().ok());
    request.rsi_max = env::var("RSI_MAX").ok().and_then(|v| v.parse().ok());

    let store = Arc::new(InMemoryJobStore::new());
    let symbols = Arc::new(StaticSymbolProvider::new());
    let market_data = Arc::new(RestMarketDataProvider::new(config::get_market_data_url()));
    let orchestrator = Arc::new(ScreeningOrchestrator::new(store, symbols, market_data));

    let job_id = orchestrator.submit(request, None).await?;
    info!(job_id = %job_id, "screening started");

    loop {
        let job = orchestrator.get_status(&job_id).await?;
        println!(
            "  [{:>3}%] screened {}/{} - found {}",
            job.progress, job.screened_stocks, job.total_stocks, job.found_stocks
        );
        if job.is_terminal() {
            break;
        }
        sleep(Duration::from_millis(500)).await;
    }

    let job = orchestrator.get_status(&job_id).await?;
    match job.status {
        JobStatus::Completed => {
            println!(
                "\nScreening completed in {:.1}s - {} match(es)",
                job.execution_time.unwrap_or_default(),
                job.results.len()
            );
            for result in &job.results {
                print_result(result);
            }
        }
        JobStatus::Failed => {
            println!(
                "\nScreening failed: {}",
                job.error_message.as_deref().unwrap_or("unknown error")
            );
        }
        other => println!("\nScreening ended with status {:?}", other),
    }

    Ok(())
}

fn print_result(result: &StockResult) {
    println!("  {}", result.stock);
    println!("    LTP: {}  RSI: {}", result.ltp, result.rsi);
    println!("    Trend: {}  MA: {}", result.trend, result.ma_signal);
    println!(
        "    {}  {}  Volume: {}",
        result.consolidating, result.breaking_out, result.volume
    );
}
