//! Moving averages over candle series

use crate::common::math;
use crate::models::Candle;

/// Simple moving average of closes over `period` bars
pub fn calculate_sma(candles: &[Candle], period: usize) -> Option<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::sma(&closes, period)
}

/// Exponential moving average of closes with a `period`-bar span
pub fn calculate_ema(candles: &[Candle], period: usize) -> Option<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema(&closes, period)
}

/// Average volume over the trailing `period` bars
pub fn average_volume(candles: &[Candle], period: usize) -> Option<f64> {
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    math::tail_mean(&volumes, period)
}
