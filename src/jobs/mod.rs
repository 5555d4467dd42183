//! Screening job engine: lifecycle, store, worker pool

pub mod orchestrator;
pub mod pool;
pub mod store;
pub mod types;

pub use orchestrator::{JobError, ScreeningOrchestrator};
pub use pool::PoolSettings;
pub use store::{InMemoryJobStore, JobStore, StoreError};
pub use types::{Job, JobStatus, JobSummary, Outcome, SymbolOutcome};
