//! Screening job orchestrator
//!
//! Owns the job lifecycle: submission creates a pending job and
//! schedules it, execution drives the worker pool over the resolved
//! universe, and every mutation of the job record flows through the
//! store from this single task. Per-symbol failures are isolated
//! outcomes; only orchestration-level errors fail the job.

use crate::jobs::pool::{self, PoolSettings};
use crate::jobs::store::{JobStore, StoreError};
use crate::jobs::types::{Job, JobStatus, JobSummary, Outcome};
use crate::metrics::Metrics;
use crate::models::{
    Candle, ScreeningConfig, ScreeningRequest, StockResult, ValidationError,
};
use crate::screening::analytics::SymbolAnalytics;
use crate::screening::evaluator::{evaluate, fill_backtest_horizons};
use crate::services::market_data::{MarketDataError, MarketDataProvider};
use crate::services::symbols::{SymbolError, SymbolProvider};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum JobError {
    /// Rejected synchronously at submit time; no job id is allocated
    #[error("invalid screening request: {0}")]
    Invalid(#[from] ValidationError),
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("job is already in a terminal state: {0}")]
    AlreadyTerminal(String),
    #[error("job has not completed yet: {0}")]
    NotCompleted(String),
    #[error("symbol resolution failed: {0}")]
    Resolution(#[from] SymbolError),
    #[error("job store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for JobError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => JobError::NotFound(id),
            other => JobError::Store(other),
        }
    }
}

pub struct ScreeningOrchestrator {
    store: Arc<dyn JobStore>,
    symbols: Arc<dyn SymbolProvider>,
    market_data: Arc<dyn MarketDataProvider>,
    metrics: Option<Arc<Metrics>>,
    cancel_tokens: RwLock<HashMap<String, CancellationToken>>,
}

impl ScreeningOrchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        symbols: Arc<dyn SymbolProvider>,
        market_data: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            store,
            symbols,
            market_data,
            metrics: None,
            cancel_tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Validate the request, create a pending job and schedule it
    ///
    /// Returns the job id without waiting for execution to start.
    pub async fn submit(
        self: &Arc<Self>,
        request: ScreeningRequest,
        config: Option<ScreeningConfig>,
    ) -> Result<String, JobError> {
        request.validate()?;
        let config = config.unwrap_or_default();
        config.validate()?;

        let job_id = Uuid::new_v4().to_string();
        let job = Job::new(job_id.clone(), request, config);
        self.store.create(job).await.map_err(JobError::Store)?;

        {
            let mut tokens = self.cancel_tokens.write().await;
            tokens.insert(job_id.clone(), CancellationToken::new());
        }

        if let Some(metrics) = &self.metrics {
            metrics.jobs_submitted_total.inc();
        }

        let orchestrator = Arc::clone(self);
        let id = job_id.clone();
        tokio::spawn(async move {
            orchestrator.execute(id).await;
        });

        info!(job_id = %job_id, "screening job submitted");
        Ok(job_id)
    }

    /// Cancel a pending or running job
    ///
    /// Pending jobs transition straight to cancelled; running jobs have
    /// their token cancelled and the pool stops at the next symbol
    /// boundary, keeping partial progress and results.
    pub async fn cancel(&self, job_id: &str) -> Result<(), JobError> {
        let flipped = Arc::new(AtomicBool::new(false));
        let observed = Arc::clone(&flipped);
        let now = Utc::now();
        self.store
            .update(
                job_id,
                Box::new(move |job| {
                    if job.cancel(now) {
                        observed.store(true, Ordering::SeqCst);
                    }
                }),
            )
            .await?;

        if !flipped.load(Ordering::SeqCst) {
            return Err(JobError::AlreadyTerminal(job_id.to_string()));
        }

        let tokens = self.cancel_tokens.read().await;
        if let Some(token) = tokens.get(job_id) {
            token.cancel();
        }

        info!(job_id = %job_id, "screening job cancelled");
        Ok(())
    }

    /// Snapshot of a job's current state
    pub async fn get_status(&self, job_id: &str) -> Result<Job, JobError> {
        Ok(self.store.get(job_id).await?)
    }

    /// Results of a completed job; anything else is `NotCompleted`
    pub async fn get_results(&self, job_id: &str) -> Result<Vec<StockResult>, JobError> {
        let job = self.store.get(job_id).await?;
        if job.status != JobStatus::Completed {
            return Err(JobError::NotCompleted(job_id.to_string()));
        }
        Ok(job.results)
    }

    pub async fn list_history(&self, limit: usize, offset: usize) -> Vec<JobSummary> {
        self.store.list(limit, offset).await
    }

    async fn execute(self: Arc<Self>, job_id: String) {
        let started = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.jobs_active.inc();
        }

        if let Err(err) = self.run_job(&job_id, started).await {
            error!(job_id = %job_id, error = %err, "screening job failed");
            let now = Utc::now();
            let message = err.to_string();
            // A store failure here means the job record is gone; there
            // is nothing left to mark.
            let _ = self
                .store
                .update(&job_id, Box::new(move |job| job.fail(now, message)))
                .await;
        }

        if let Some(metrics) = &self.metrics {
            metrics.jobs_active.dec();
            metrics
                .screening_duration_seconds
                .observe(started.elapsed().as_secs_f64());
        }

        let mut tokens = self.cancel_tokens.write().await;
        tokens.remove(&job_id);
    }

    async fn run_job(&self, job_id: &str, started: Instant) -> Result<(), JobError> {
        let job = self.store.get(job_id).await?;
        if job.status == JobStatus::Cancelled {
            info!(job_id = %job_id, "job cancelled before it started");
            return Ok(());
        }
        let request = job.request.clone();
        let config = job.config.clone();

        let now = Utc::now();
        self.store
            .update(job_id, Box::new(move |job| job.mark_running(now)))
            .await?;

        let symbols = if !request.stock_codes.is_empty() {
            request.stock_codes.clone()
        } else {
            self.symbols.resolve(request.index_type).await?
        };

        let total = symbols.len();
        self.store
            .update(job_id, Box::new(move |job| job.set_total(total)))
            .await?;

        if total == 0 {
            let now = Utc::now();
            let secs = started.elapsed().as_secs_f64();
            self.store
                .update(
                    job_id,
                    Box::new(move |job| job.complete(now, secs, Vec::new())),
                )
                .await?;
            info!(job_id = %job_id, "empty universe, job completed with zero results");
            return Ok(());
        }

        info!(
            job_id = %job_id,
            total_stocks = total,
            concurrency = config.concurrency,
            "screening {} symbols",
            total
        );

        let token = {
            let tokens = self.cancel_tokens.read().await;
            tokens.get(job_id).cloned().unwrap_or_default()
        };
        let settings = PoolSettings {
            concurrency: config.concurrency.max(1),
            pacing: Duration::from_millis(config.pacing_ms),
        };

        let market_data = Arc::clone(&self.market_data);
        let request = Arc::new(request);
        let config_shared = Arc::new(config);
        let per_symbol = {
            let request = Arc::clone(&request);
            let config = Arc::clone(&config_shared);
            move |symbol: String| {
                let market_data = Arc::clone(&market_data);
                let request = Arc::clone(&request);
                let config = Arc::clone(&config);
                async move { screen_symbol(&symbol, market_data.as_ref(), &request, &config).await }
            }
        };

        let mut rx = pool::run(symbols, settings, token.clone(), per_symbol);
        let mut matches: Vec<(usize, StockResult)> = Vec::new();

        while let Some(symbol_outcome) = rx.recv().await {
            match &symbol_outcome.outcome {
                Outcome::Match(result) => {
                    debug!(symbol = %symbol_outcome.symbol, "criteria matched");
                    matches.push((symbol_outcome.index, result.clone()));
                }
                Outcome::Reject { reason } => {
                    debug!(symbol = %symbol_outcome.symbol, reason = %reason, "screened out");
                }
                Outcome::Error { message } => {
                    warn!(symbol = %symbol_outcome.symbol, error = %message, "symbol skipped");
                }
            }

            if let Some(metrics) = &self.metrics {
                metrics.symbols_screened_total.inc();
            }

            let recorded = symbol_outcome.clone();
            self.store
                .update(job_id, Box::new(move |job| job.record_outcome(&recorded)))
                .await?;
        }

        // Reproducible output: order matches by their position in the
        // resolved universe, not by completion order.
        matches.sort_by_key(|(index, _)| *index);
        let results: Vec<StockResult> = matches.into_iter().map(|(_, result)| result).collect();
        let found = results.len();
        let secs = started.elapsed().as_secs_f64();
        let now = Utc::now();

        if token.is_cancelled() {
            self.store
                .update(
                    job_id,
                    Box::new(move |job| job.finalize_cancelled(now, secs, results)),
                )
                .await?;
            info!(job_id = %job_id, found_stocks = found, "job cancelled, partial results retained");
        } else {
            self.store
                .update(job_id, Box::new(move |job| job.complete(now, secs, results)))
                .await?;
            if let Some(metrics) = &self.metrics {
                metrics.stocks_found_total.inc_by(found as u64);
            }
            info!(job_id = %job_id, found_stocks = found, "screening job completed");
        }

        Ok(())
    }
}

/// The per-symbol pipeline: fetch, analyze, evaluate
///
/// Failures become `Outcome::Error`; short history is a reject, per
/// the screening contract.
async fn screen_symbol(
    symbol: &str,
    market_data: &dyn MarketDataProvider,
    request: &ScreeningRequest,
    config: &ScreeningConfig,
) -> Outcome {
    let candles = match market_data.fetch(symbol, &config.period).await {
        Ok(candles) => candles,
        Err(MarketDataError::NoData) => {
            return Outcome::Error {
                message: "no market data".to_string(),
            }
        }
        Err(err) => {
            return Outcome::Error {
                message: err.to_string(),
            }
        }
    };

    let no_future: &[Candle] = &[];
    let (history, future) = match request.backtest_date {
        Some(date) => split_at_date(&candles, date),
        None => (candles.as_slice(), no_future),
    };

    let analytics = match SymbolAnalytics::compute(history, config) {
        Some(analytics) => analytics,
        None => {
            return Outcome::Reject {
                reason: "insufficient history".to_string(),
            }
        }
    };

    match evaluate(symbol, &analytics, request, config) {
        Some(mut result) => {
            if request.backtest_date.is_some() {
                fill_backtest_horizons(&mut result, analytics.last_close, future);
            }
            Outcome::Match(result)
        }
        None => Outcome::Reject {
            reason: "criteria not met".to_string(),
        },
    }
}

fn split_at_date(candles: &[Candle], date: NaiveDate) -> (&[Candle], &[Candle]) {
    let split = candles.partition_point(|c| c.timestamp.date_naive() <= date);
    candles.split_at(split)
}
