//! Symbol analytics and criteria evaluation

pub mod analytics;
pub mod evaluator;

pub use analytics::{SymbolAnalytics, MIN_HISTORY};
pub use evaluator::{evaluate, fill_backtest_horizons};
