//! Per-symbol analytics derived from a candle series

use crate::indicators::momentum::rsi::calculate_rsi_default;
use crate::indicators::trend::ma::{average_volume, calculate_ema, calculate_sma};
use crate::models::{Candle, ScreeningConfig};

/// Minimum bars of history required before a symbol can be analyzed
pub const MIN_HISTORY: usize = 50;

/// Ephemeral per-symbol computation, owned by the evaluation that
/// produced it and never persisted
#[derive(Debug, Clone)]
pub struct SymbolAnalytics {
    pub last_close: f64,
    pub rsi: f64,
    pub sma_50: f64,
    pub sma_200: Option<f64>,
    pub ema_50: f64,
    pub ema_200: Option<f64>,
    pub avg_volume_20: f64,
    pub volume_ratio: f64,
    pub high_30d: f64,
    pub low_30d: f64,
    pub consolidation_range_pct: f64,
}

impl SymbolAnalytics {
    /// Derive analytics from a daily candle series
    ///
    /// Returns `None` when the series is shorter than [`MIN_HISTORY`];
    /// the 200-bar averages stay `None` below 200 bars and can never
    /// satisfy the strong trend comparisons.
    pub fn compute(candles: &[Candle], config: &ScreeningConfig) -> Option<Self> {
        if candles.len() < MIN_HISTORY {
            return None;
        }

        let last = candles.last()?;
        let last_close = last.close;

        let rsi = calculate_rsi_default(candles)?;
        let sma_50 = calculate_sma(candles, 50)?;
        let ema_50 = calculate_ema(candles, 50)?;
        let sma_200 = calculate_sma(candles, 200);
        let ema_200 = calculate_ema(candles, 200);

        let avg_volume_20 = average_volume(candles, 20)?;
        let volume_ratio = if avg_volume_20 > 0.0 {
            last.volume / avg_volume_20
        } else {
            1.0
        };

        let lookback = config.days_to_lookback.max(1);
        let recent = &candles[candles.len().saturating_sub(lookback)..];
        let high_30d = recent.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let low_30d = recent.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let consolidation_range_pct = if high_30d > 0.0 {
            ((high_30d - low_30d) / high_30d) * 100.0
        } else {
            0.0
        };

        Some(Self {
            last_close,
            rsi,
            sma_50,
            sma_200,
            ema_50,
            ema_200,
            avg_volume_20,
            volume_ratio,
            high_30d,
            low_30d,
            consolidation_range_pct,
        })
    }
}
