//! External collaborators: market data and symbol universe providers

pub mod market_data;
pub mod rest_provider;
pub mod symbols;

pub use market_data::{FixtureMarketDataProvider, MarketDataError, MarketDataProvider};
pub use rest_provider::RestMarketDataProvider;
pub use symbols::{StaticSymbolProvider, SymbolError, SymbolProvider};
