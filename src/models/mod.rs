//! Data models shared across the engine layers.

pub mod candle;
pub mod screening;

pub use candle::Candle;
pub use screening::{
    ChartPattern, IndexType, ReversalType, ScreeningConfig, ScreeningCriteria, ScreeningRequest,
    StockResult, ValidationError,
};
