//! Criteria evaluation: analytics in, accept/reject + result row out

use crate::models::{Candle, ScreeningConfig, ScreeningCriteria, ScreeningRequest, StockResult};
use crate::screening::analytics::SymbolAnalytics;

/// Evaluate a symbol's analytics against the requested criteria
///
/// Pure and synchronous. Returns `None` when the symbol is screened
/// out; criteria kinds without a concrete check pass through.
pub fn evaluate(
    symbol: &str,
    analytics: &SymbolAnalytics,
    request: &ScreeningRequest,
    config: &ScreeningConfig,
) -> Option<StockResult> {
    if analytics.last_close < config.min_price || analytics.last_close > config.max_price {
        return None;
    }

    if !meets_criteria(analytics, request, config) {
        return None;
    }

    Some(build_result(symbol, analytics, config))
}

fn meets_criteria(
    analytics: &SymbolAnalytics,
    request: &ScreeningRequest,
    config: &ScreeningConfig,
) -> bool {
    match request.criteria {
        ScreeningCriteria::RsiScreening => {
            let rsi = analytics.rsi;
            if let Some(min) = request.rsi_min {
                if rsi < min as f64 {
                    return false;
                }
            }
            if let Some(max) = request.rsi_max {
                if rsi > max as f64 {
                    return false;
                }
            }
            true
        }
        ScreeningCriteria::BreakoutVolume => analytics.volume_ratio >= config.volume_ratio,
        ScreeningCriteria::Consolidating => {
            analytics.consolidation_range_pct <= config.consolidation_percentage
        }
        ScreeningCriteria::BreakoutConsolidation => {
            analytics.consolidation_range_pct <= config.consolidation_percentage
                && analytics.last_close >= analytics.high_30d
        }
        ScreeningCriteria::LowestVolume => analytics.volume_ratio <= 1.0,
        // Extension points: no concrete check defined yet, pass through
        ScreeningCriteria::FullScreening
        | ScreeningCriteria::ReversalSignals
        | ScreeningCriteria::ChartPatterns => true,
    }
}

fn build_result(symbol: &str, analytics: &SymbolAnalytics, config: &ScreeningConfig) -> StockResult {
    let (ma_50, ma_200) = if config.use_ema {
        (analytics.ema_50, analytics.ema_200)
    } else {
        (analytics.sma_50, analytics.sma_200)
    };
    let (trend, ma_signal) = categorize_trend(analytics.last_close, ma_50, ma_200);

    StockResult {
        stock: symbol.to_string(),
        consolidating: format!("Range = {:.1}%", analytics.consolidation_range_pct),
        breaking_out: format!("BO: {:.2}", analytics.high_30d),
        ltp: format!("{:.2}", analytics.last_close),
        volume: format!("{:.1}x", analytics.volume_ratio),
        ma_signal: ma_signal.to_string(),
        rsi: analytics.rsi.round() as i64,
        trend: trend.to_string(),
        pattern: String::new(),
        t_plus_1d: None,
        t_plus_1wk: None,
        t_plus_1mo: None,
        t_plus_6mo: None,
        t_plus_1y: None,
        t_plus_52wk_high: None,
        t_plus_52wk_low: None,
    }
}

/// Categorize trend and MA signal from the close vs the 50/200 averages
///
/// A missing 200-bar average (short history) fails both strong
/// comparisons, matching the NaN behavior of rolling windows.
fn categorize_trend(close: f64, ma_50: f64, ma_200: Option<f64>) -> (&'static str, &'static str) {
    let above_long = ma_200.map_or(false, |m| ma_50 > m);
    let below_long = ma_200.map_or(false, |m| ma_50 < m);

    if close > ma_50 && above_long {
        ("Strong Up", "Bullish")
    } else if close > ma_50 {
        ("Weak Up", "Neutral")
    } else if close < ma_50 && below_long {
        ("Strong Down", "Bearish")
    } else {
        ("Sideways", "Neutral")
    }
}

/// Trading-day horizons for backtest reporting: label + bar offset
const BACKTEST_HORIZONS: [(usize, Horizon); 5] = [
    (1, Horizon::OneDay),
    (5, Horizon::OneWeek),
    (21, Horizon::OneMonth),
    (126, Horizon::SixMonths),
    (252, Horizon::OneYear),
];

#[derive(Clone, Copy)]
enum Horizon {
    OneDay,
    OneWeek,
    OneMonth,
    SixMonths,
    OneYear,
}

/// Fill the t+ horizon fields of a result from the bars after the
/// backtest date
///
/// Horizons whose future window is missing stay unset. The 52-week
/// extremes cover the following 252 bars (or whatever is available).
pub fn fill_backtest_horizons(result: &mut StockResult, entry_close: f64, future: &[Candle]) {
    if entry_close <= 0.0 || future.is_empty() {
        return;
    }

    for (bars, horizon) in BACKTEST_HORIZONS {
        if future.len() < bars {
            continue;
        }
        let pct = ((future[bars - 1].close - entry_close) / entry_close) * 100.0;
        let formatted = format!("{:+.1}%", pct);
        match horizon {
            Horizon::OneDay => result.t_plus_1d = Some(formatted),
            Horizon::OneWeek => result.t_plus_1wk = Some(formatted),
            Horizon::OneMonth => result.t_plus_1mo = Some(formatted),
            Horizon::SixMonths => result.t_plus_6mo = Some(formatted),
            Horizon::OneYear => result.t_plus_1y = Some(formatted),
        }
    }

    let window = &future[..future.len().min(252)];
    let high = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    result.t_plus_52wk_high = Some(format!("{:.2}", high));
    result.t_plus_52wk_low = Some(format!("{:.2}", low));
}
