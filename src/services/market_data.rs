//! Market data provider interface and in-memory test double

use crate::models::Candle;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MarketDataError {
    /// The source knows the symbol but has no series for it
    #[error("no market data available")]
    NoData,
    /// Transport or upstream failure; per-symbol, never fatal to a job
    #[error("fetch failed: {0}")]
    Fetch(String),
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the historical daily series for a symbol
    async fn fetch(&self, symbol: &str, period: &str) -> Result<Vec<Candle>, MarketDataError>;
}

/// Canned provider serving pre-loaded series; used by tests and the
/// screener binary's dry-run mode
#[derive(Debug, Default)]
pub struct FixtureMarketDataProvider {
    series: HashMap<String, Vec<Candle>>,
    failing: HashSet<String>,
}

impl FixtureMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.series.insert(symbol.to_string(), candles);
        self
    }

    /// Make `fetch` fail for a symbol, to exercise per-symbol isolation
    pub fn with_failure(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }
}

#[async_trait]
impl MarketDataProvider for FixtureMarketDataProvider {
    async fn fetch(&self, symbol: &str, _period: &str) -> Result<Vec<Candle>, MarketDataError> {
        if self.failing.contains(symbol) {
            return Err(MarketDataError::Fetch(format!(
                "simulated transport failure for {}",
                symbol
            )));
        }
        match self.series.get(symbol) {
            Some(candles) if !candles.is_empty() => Ok(candles.clone()),
            _ => Err(MarketDataError::NoData),
        }
    }
}
