//! Trend indicators: simple and exponential moving averages

pub mod ma;

pub use ma::*;
