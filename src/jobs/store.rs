//! Job store: keyed job records behind an injected abstraction
//!
//! The orchestrator never touches process-wide mutable state; whoever
//! constructs the store owns its lifetime and retention policy.

use crate::jobs::types::{Job, JobSummary};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("job already exists: {0}")]
    Duplicate(String),
}

/// Closure applied atomically inside `update`
pub type JobMutator = Box<dyn FnOnce(&mut Job) + Send>;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: Job) -> Result<(), StoreError>;

    /// Snapshot of a job by id
    async fn get(&self, job_id: &str) -> Result<Job, StoreError>;

    /// Atomic read-modify-write; concurrent invocations on the same id
    /// are serialized by the store. Returns the post-mutation snapshot.
    async fn update(&self, job_id: &str, mutator: JobMutator) -> Result<Job, StoreError>;

    /// Job summaries ordered by creation time, newest first
    async fn list(&self, limit: usize, offset: usize) -> Vec<JobSummary>;
}

/// In-memory store backing; a durable implementation can be swapped in
/// behind the same trait
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.job_id) {
            return Err(StoreError::Duplicate(job.job_id.clone()));
        }
        jobs.insert(job.job_id.clone(), job);
        Ok(())
    }

    async fn get(&self, job_id: &str) -> Result<Job, StoreError> {
        let jobs = self.jobs.read().await;
        jobs.get(job_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))
    }

    async fn update(&self, job_id: &str, mutator: JobMutator) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        mutator(job);
        Ok(job.clone())
    }

    async fn list(&self, limit: usize, offset: usize) -> Vec<JobSummary> {
        let jobs = self.jobs.read().await;
        let mut summaries: Vec<JobSummary> = jobs.values().map(JobSummary::from).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries.into_iter().skip(offset).take(limit).collect()
    }
}
