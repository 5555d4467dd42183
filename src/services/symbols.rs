//! Symbol universe resolution

use crate::models::IndexType;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SymbolError {
    #[error("unknown universe selector: {0:?}")]
    UnknownSelector(IndexType),
}

#[async_trait]
pub trait SymbolProvider: Send + Sync {
    /// Resolve a universe selector into an ordered symbol list
    async fn resolve(&self, index: IndexType) -> Result<Vec<String>, SymbolError>;
}

/// Static index tables
///
/// Index membership changes rarely enough that a shipped table is fine
/// for screening; selectors without a table resolve to
/// `UnknownSelector`.
#[derive(Debug, Default)]
pub struct StaticSymbolProvider;

impl StaticSymbolProvider {
    pub fn new() -> Self {
        Self
    }

    fn nifty_50() -> Vec<String> {
        [
            "RELIANCE", "TCS", "HDFCBANK", "INFY", "HINDUNILVR", "ICICIBANK", "KOTAKBANK", "SBIN",
            "BHARTIARTL", "ITC", "ASIANPAINT", "LT", "AXISBANK", "MARUTI", "SUNPHARMA", "TITAN",
            "ULTRACEMCO", "NESTLEIND", "WIPRO", "M&M", "NTPC", "HCLTECH", "POWERGRID",
            "TATAMOTORS", "BAJFINANCE", "TECHM", "ONGC", "TATASTEEL", "ADANIPORTS", "COALINDIA",
            "INDUSINDBK", "DRREDDY", "GRASIM", "JSWSTEEL", "HINDALCO", "CIPLA", "EICHERMOT",
            "HEROMOTOCO", "BAJAJFINSV", "UPL", "BRITANNIA", "DIVISLAB", "APOLLOHOSP",
            "TATACONSUM", "BAJAJ-AUTO", "HDFCLIFE", "SBILIFE", "BPCL", "SHREECEM", "IOC",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn additional_stocks() -> Vec<String> {
        [
            "ADANIENT", "ADANIGREEN", "ADANIPOWER", "AMBUJACEM", "BANKBARODA", "BERGEPAINT",
            "BIOCON", "BOSCHLTD", "CADILAHC", "CANBK",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[async_trait]
impl SymbolProvider for StaticSymbolProvider {
    async fn resolve(&self, index: IndexType) -> Result<Vec<String>, SymbolError> {
        match index {
            // Explicit stock codes are handled before resolution; an
            // empty list here yields an empty (immediately completed)
            // screening.
            IndexType::ByStockName => Ok(Vec::new()),
            IndexType::Nifty50 => Ok(Self::nifty_50()),
            IndexType::AllStocks => {
                let mut all = Self::nifty_50();
                all.extend(Self::additional_stocks());
                Ok(all)
            }
            other => Err(SymbolError::UnknownSelector(other)),
        }
    }
}
