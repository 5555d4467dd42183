//! Job record, lifecycle transitions and per-symbol outcomes

use crate::models::{ScreeningConfig, ScreeningRequest, StockResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job lifecycle states
///
/// `Pending → Running → {Completed | Failed | Cancelled}`; the three
/// terminal states are never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// Per-symbol result of the screening pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The symbol passed the criteria
    Match(StockResult),
    /// The symbol was screened out (including insufficient history)
    Reject { reason: String },
    /// The pipeline failed for this symbol; isolated, never aborts the job
    Error { message: String },
}

/// An outcome tagged with the symbol and its position in the resolved
/// universe (used to make final result ordering reproducible)
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolOutcome {
    pub index: usize,
    pub symbol: String,
    pub outcome: Outcome,
}

/// Mutable screening job record
///
/// All writes flow through the orchestrator via the job store's atomic
/// `update`; external callers only ever see snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    /// Percent of the universe screened so far, 0-100, monotonic while running
    pub progress: u8,
    pub total_stocks: usize,
    pub screened_stocks: usize,
    pub found_stocks: usize,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall-clock duration in seconds, set exactly once at finalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    pub results: Vec<StockResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub request: ScreeningRequest,
    pub config: ScreeningConfig,
}

impl Job {
    pub fn new(job_id: String, request: ScreeningRequest, config: ScreeningConfig) -> Self {
        Self {
            job_id,
            status: JobStatus::Pending,
            progress: 0,
            total_stocks: 0,
            screened_stocks: 0,
            found_stocks: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            execution_time: None,
            results: Vec::new(),
            error_message: None,
            request,
            config,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Outcomes are accepted while running, and while draining in-flight
    /// work after a cancellation (until `execution_time` freezes the job)
    fn accepting_outcomes(&self) -> bool {
        match self.status {
            JobStatus::Running => true,
            JobStatus::Cancelled => self.execution_time.is_none(),
            _ => false,
        }
    }

    pub fn mark_running(&mut self, now: DateTime<Utc>) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Running;
            self.started_at = Some(now);
        }
    }

    pub fn set_total(&mut self, total: usize) {
        if self.status == JobStatus::Running {
            self.total_stocks = total;
        }
    }

    /// Account one per-symbol outcome: every outcome advances
    /// `screened_stocks`, only matches advance `found_stocks`
    pub fn record_outcome(&mut self, outcome: &SymbolOutcome) {
        if !self.accepting_outcomes() {
            return;
        }
        self.screened_stocks += 1;
        if let Outcome::Match(result) = &outcome.outcome {
            self.found_stocks += 1;
            self.results.push(result.clone());
        }
        if self.total_stocks > 0 {
            self.progress = ((100 * self.screened_stocks) / self.total_stocks) as u8;
        }
    }

    pub fn complete(
        &mut self,
        now: DateTime<Utc>,
        execution_secs: f64,
        results: Vec<StockResult>,
    ) {
        if self.status != JobStatus::Running {
            return;
        }
        self.status = JobStatus::Completed;
        self.completed_at = Some(now);
        self.execution_time = Some(execution_secs);
        self.found_stocks = results.len();
        self.results = results;
        self.progress = 100;
        self.error_message = None;
    }

    /// Flip to cancelled; returns false when the job is already terminal
    pub fn cancel(&mut self, now: DateTime<Utc>) -> bool {
        match self.status {
            JobStatus::Pending | JobStatus::Running => {
                self.status = JobStatus::Cancelled;
                self.completed_at = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Freeze a cancelled job after the pool drained, keeping the
    /// partial counters and results
    pub fn finalize_cancelled(
        &mut self,
        now: DateTime<Utc>,
        execution_secs: f64,
        results: Vec<StockResult>,
    ) {
        if self.status != JobStatus::Cancelled || self.execution_time.is_some() {
            return;
        }
        self.completed_at.get_or_insert(now);
        self.execution_time = Some(execution_secs);
        self.found_stocks = results.len();
        self.results = results;
    }

    pub fn fail(&mut self, now: DateTime<Utc>, message: String) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.completed_at = Some(now);
        self.error_message = Some(message);
    }
}

/// Status-surface projection of a job, without the result payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub total_stocks: usize,
    pub screened_stocks: usize,
    pub found_stocks: usize,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.job_id.clone(),
            status: job.status,
            progress: job.progress,
            total_stocks: job.total_stocks,
            screened_stocks: job.screened_stocks,
            found_stocks: job.found_stocks,
            created_at: job.created_at,
            completed_at: job.completed_at,
            error_message: job.error_message.clone(),
        }
    }
}
