//! REST-backed market data provider
//!
//! Fetches daily candle series from a configurable HTTP source and
//! keeps a per-process series cache so repeated jobs over the same
//! universe do not hammer the upstream. The upstream is expected to
//! answer `GET {base}/candles/{symbol}?period=...` with a JSON array
//! of OHLCV bars; adapting a real vendor feed to that shape is the
//! deployment's concern.

use crate::models::Candle;
use crate::services::market_data::{MarketDataError, MarketDataProvider};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

pub struct RestMarketDataProvider {
    client: reqwest::Client,
    base_url: String,
    cache_enabled: bool,
    cache: RwLock<HashMap<String, Vec<Candle>>>,
    max_retries: usize,
}

impl RestMarketDataProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            cache_enabled: true,
            cache: RwLock::new(HashMap::new()),
            max_retries: 3,
        }
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    async fn fetch_remote(&self, symbol: &str, period: &str) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}/candles/{}?period={}", self.base_url, symbol, period);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| MarketDataError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MarketDataError::Fetch(format!(
                "upstream returned {} for {}",
                response.status(),
                symbol
            )));
        }

        response
            .json::<Vec<Candle>>()
            .await
            .map_err(|e| MarketDataError::Fetch(format!("malformed candle payload: {}", e)))
    }
}

#[async_trait]
impl MarketDataProvider for RestMarketDataProvider {
    async fn fetch(&self, symbol: &str, period: &str) -> Result<Vec<Candle>, MarketDataError> {
        let cache_key = format!("{}_{}", symbol, period);

        if self.cache_enabled {
            let cache = self.cache.read().await;
            if let Some(candles) = cache.get(&cache_key) {
                debug!(symbol = %symbol, count = candles.len(), "candle cache hit");
                return Ok(candles.clone());
            }
        }

        let mut candles = (|| self.fetch_remote(symbol, period))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(100))
                    .with_max_times(self.max_retries),
            )
            .when(|e| matches!(e, MarketDataError::Fetch(_)))
            .await?;

        if candles.is_empty() {
            return Err(MarketDataError::NoData);
        }

        candles.sort_by_key(|c| c.timestamp);

        if self.cache_enabled {
            let mut cache = self.cache.write().await;
            cache.insert(cache_key, candles.clone());
        }

        Ok(candles)
    }
}
