//! Screening request, configuration and result data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Universe selector: which group of symbols to screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    #[serde(rename = "0")]
    ByStockName,
    #[serde(rename = "1")]
    Nifty50,
    #[serde(rename = "2")]
    NiftyNext50,
    #[serde(rename = "3")]
    Nifty100,
    #[serde(rename = "4")]
    Nifty200,
    #[serde(rename = "5")]
    Nifty500,
    #[serde(rename = "6")]
    NiftySmallcap50,
    #[serde(rename = "7")]
    NiftySmallcap100,
    #[serde(rename = "8")]
    NiftySmallcap250,
    #[serde(rename = "9")]
    NiftyMidcap50,
    #[serde(rename = "10")]
    NiftyMidcap100,
    #[serde(rename = "11")]
    NiftyMidcap150,
    #[serde(rename = "12")]
    AllStocks,
    #[serde(rename = "13")]
    NewlyListed,
    #[serde(rename = "14")]
    FnoStocks,
    #[serde(rename = "15")]
    UsSp500,
    #[serde(rename = "16")]
    SectoralIndices,
}

impl IndexType {
    /// Parse the numeric index code used by clients (e.g. "1" = Nifty 50)
    pub fn from_code(code: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(code.to_string())).ok()
    }
}

/// Screening rule applied to per-symbol analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningCriteria {
    #[serde(rename = "0")]
    FullScreening,
    #[serde(rename = "1")]
    BreakoutConsolidation,
    #[serde(rename = "2")]
    BreakoutVolume,
    #[serde(rename = "3")]
    Consolidating,
    #[serde(rename = "4")]
    LowestVolume,
    #[serde(rename = "5")]
    RsiScreening,
    #[serde(rename = "6")]
    ReversalSignals,
    #[serde(rename = "7")]
    ChartPatterns,
}

impl ScreeningCriteria {
    pub fn from_code(code: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(code.to_string())).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReversalType {
    #[serde(rename = "1")]
    BuySignal,
    #[serde(rename = "2")]
    SellSignal,
    #[serde(rename = "3")]
    MomentumGainers,
    #[serde(rename = "4")]
    MaReversal,
    #[serde(rename = "5")]
    VsaReversal,
    #[serde(rename = "6")]
    NarrowRange,
    #[serde(rename = "7")]
    Lorentzian,
    #[serde(rename = "8")]
    RsiMaCrossing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartPattern {
    #[serde(rename = "1")]
    BullishInsideBar,
    #[serde(rename = "2")]
    BearishInsideBar,
    #[serde(rename = "3")]
    Confluence,
    #[serde(rename = "4")]
    Vcp,
    #[serde(rename = "5")]
    TrendlineSupport,
}

/// Immutable screening job input
///
/// `stock_codes`, when non-empty, overrides universe resolution for
/// `index_type`. Criteria-specific parameters are optional and only read
/// by the criteria they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRequest {
    pub index_type: IndexType,
    pub criteria: ScreeningCriteria,
    #[serde(default)]
    pub stock_codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtest_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversal_type: Option<ReversalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nr_range: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_pattern: Option<ChartPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookback_candles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confluence_percentage: Option<f64>,
}

impl ScreeningRequest {
    pub fn new(index_type: IndexType, criteria: ScreeningCriteria) -> Self {
        Self {
            index_type,
            criteria,
            stock_codes: Vec::new(),
            backtest_date: None,
            rsi_min: None,
            rsi_max: None,
            volume_days: None,
            reversal_type: None,
            ma_length: None,
            nr_range: None,
            chart_pattern: None,
            lookback_candles: None,
            confluence_percentage: None,
        }
    }

    pub fn with_stock_codes(mut self, codes: Vec<String>) -> Self {
        self.stock_codes = codes;
        self
    }

    pub fn with_rsi_bounds(mut self, min: u32, max: u32) -> Self {
        self.rsi_min = Some(min);
        self.rsi_max = Some(max);
        self
    }

    pub fn with_backtest_date(mut self, date: NaiveDate) -> Self {
        self.backtest_date = Some(date);
        self
    }

    /// Validate the request before a job is created for it
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(min), Some(max)) = (self.rsi_min, self.rsi_max) {
            if min >= max {
                return Err(ValidationError::RsiBounds { min, max });
            }
        }
        if let Some(min) = self.rsi_min {
            if min > 100 {
                return Err(ValidationError::RsiOutOfRange(min));
            }
        }
        if let Some(max) = self.rsi_max {
            if max > 100 {
                return Err(ValidationError::RsiOutOfRange(max));
            }
        }
        Ok(())
    }
}

/// Tunable screening knobs with per-request overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// History window requested from the market data provider
    pub period: String,
    /// Consolidation/breakout lookback in trading days
    pub days_to_lookback: usize,
    pub min_price: f64,
    pub max_price: f64,
    /// Volume spike threshold for breakout-with-volume screening
    pub volume_ratio: f64,
    /// Maximum 30-day range, in percent, for a stock to count as consolidating
    pub consolidation_percentage: f64,
    /// Maximum symbols screened concurrently
    pub concurrency: usize,
    /// Delay between symbol dispatches, to stay polite to the data source
    pub pacing_ms: u64,
    pub cache_enabled: bool,
    /// Categorize trend against the EMA pair instead of the SMA pair
    pub use_ema: bool,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            period: "300d".to_string(),
            days_to_lookback: 30,
            min_price: 30.0,
            max_price: 10_000.0,
            volume_ratio: 2.0,
            consolidation_percentage: 10.0,
            concurrency: 5,
            pacing_ms: 100,
            cache_enabled: true,
            use_ema: false,
        }
    }
}

impl ScreeningConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_price >= self.max_price {
            return Err(ValidationError::PriceBounds {
                min: self.min_price,
                max: self.max_price,
            });
        }
        Ok(())
    }
}

/// Synchronous request rejection, raised before any job is created
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("rsi_max ({max}) must be greater than rsi_min ({min})")]
    RsiBounds { min: u32, max: u32 },
    #[error("RSI bound {0} is outside 0-100")]
    RsiOutOfRange(u32),
    #[error("max_price ({max}) must be greater than min_price ({min})")]
    PriceBounds { min: f64, max: f64 },
}

/// One row of screening output, immutable once produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockResult {
    pub stock: String,
    pub consolidating: String,
    pub breaking_out: String,
    pub ltp: String,
    pub volume: String,
    pub ma_signal: String,
    pub rsi: i64,
    pub trend: String,
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_plus_1d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_plus_1wk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_plus_1mo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_plus_6mo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_plus_1y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_plus_52wk_high: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_plus_52wk_low: Option<String>,
}
