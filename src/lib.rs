//! Screenix: stock screening engine
//!
//! Screens a symbol universe against technical criteria as
//! cancellable, progress-reporting background jobs with bounded
//! concurrency, and serves job state over a thin HTTP gateway.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod screening;
pub mod services;
