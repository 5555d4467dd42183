//! Environment-driven service configuration

use std::env;

/// Deployment environment name; drives log formatting
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// HTTP listen port for the API server
pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000)
}

/// Base URL of the market data source consumed by the REST provider
pub fn get_market_data_url() -> String {
    env::var("MARKET_DATA_URL").unwrap_or_else(|_| "http://localhost:9000".to_string())
}
