//! Service surface: HTTP gateway and export formatting

pub mod export;
pub mod http;

pub use http::{create_router, AppState, HealthStatus};
