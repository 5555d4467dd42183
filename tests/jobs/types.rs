//! Unit tests for job lifecycle transitions

use chrono::Utc;
use screenix::jobs::types::{Job, JobStatus, Outcome, SymbolOutcome};
use screenix::models::{
    IndexType, ScreeningConfig, ScreeningCriteria, ScreeningRequest, StockResult,
};

fn new_job() -> Job {
    Job::new(
        "job-1".to_string(),
        ScreeningRequest::new(IndexType::Nifty50, ScreeningCriteria::FullScreening),
        ScreeningConfig::default(),
    )
}

fn match_outcome(symbol: &str, index: usize) -> SymbolOutcome {
    SymbolOutcome {
        index,
        symbol: symbol.to_string(),
        outcome: Outcome::Match(sample_result(symbol)),
    }
}

fn reject_outcome(symbol: &str, index: usize) -> SymbolOutcome {
    SymbolOutcome {
        index,
        symbol: symbol.to_string(),
        outcome: Outcome::Reject {
            reason: "criteria not met".to_string(),
        },
    }
}

fn sample_result(symbol: &str) -> StockResult {
    StockResult {
        stock: symbol.to_string(),
        consolidating: "Range = 4.0%".to_string(),
        breaking_out: "BO: 102.00".to_string(),
        ltp: "100.00".to_string(),
        volume: "1.0x".to_string(),
        ma_signal: "Bullish".to_string(),
        rsi: 50,
        trend: "Strong Up".to_string(),
        pattern: String::new(),
        t_plus_1d: None,
        t_plus_1wk: None,
        t_plus_1mo: None,
        t_plus_6mo: None,
        t_plus_1y: None,
        t_plus_52wk_high: None,
        t_plus_52wk_low: None,
    }
}

#[test]
fn new_jobs_start_pending() {
    let job = new_job();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.progress, 0);
    assert!(!job.is_terminal());
}

#[test]
fn mark_running_only_from_pending() {
    let mut job = new_job();
    job.mark_running(Utc::now());
    assert_eq!(job.status, JobStatus::Running);
    assert!(job.started_at.is_some());

    job.cancel(Utc::now());
    let cancelled_at = job.started_at;
    job.mark_running(Utc::now());
    assert_eq!(job.status, JobStatus::Cancelled);
    assert_eq!(job.started_at, cancelled_at);
}

#[test]
fn outcomes_advance_counters_and_progress() {
    let mut job = new_job();
    job.mark_running(Utc::now());
    job.set_total(3);

    job.record_outcome(&match_outcome("AAA", 0));
    assert_eq!(job.screened_stocks, 1);
    assert_eq!(job.found_stocks, 1);
    assert_eq!(job.progress, 33);

    job.record_outcome(&reject_outcome("BBB", 1));
    assert_eq!(job.screened_stocks, 2);
    assert_eq!(job.found_stocks, 1);
    assert_eq!(job.progress, 66);

    job.record_outcome(&SymbolOutcome {
        index: 2,
        symbol: "CCC".to_string(),
        outcome: Outcome::Error {
            message: "fetch failed".to_string(),
        },
    });
    assert_eq!(job.screened_stocks, 3);
    assert_eq!(job.found_stocks, 1);
    assert_eq!(job.progress, 100);
    assert_eq!(job.found_stocks, job.results.len());
}

#[test]
fn outcomes_are_ignored_before_running() {
    let mut job = new_job();
    job.record_outcome(&match_outcome("AAA", 0));
    assert_eq!(job.screened_stocks, 0);
    assert!(job.results.is_empty());
}

#[test]
fn complete_freezes_the_record() {
    let mut job = new_job();
    job.mark_running(Utc::now());
    job.set_total(1);
    job.record_outcome(&match_outcome("AAA", 0));
    job.complete(Utc::now(), 1.5, vec![sample_result("AAA")]);

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.execution_time, Some(1.5));
    assert!(job.error_message.is_none());

    // Terminal: later transitions are no-ops
    assert!(!job.cancel(Utc::now()));
    job.fail(Utc::now(), "late failure".to_string());
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error_message.is_none());
}

#[test]
fn cancelled_jobs_accept_draining_outcomes_until_finalized() {
    let mut job = new_job();
    job.mark_running(Utc::now());
    job.set_total(10);
    job.record_outcome(&match_outcome("AAA", 0));

    assert!(job.cancel(Utc::now()));
    assert_eq!(job.status, JobStatus::Cancelled);

    // An in-flight symbol drains after the cancel flips the status
    job.record_outcome(&reject_outcome("BBB", 1));
    assert_eq!(job.screened_stocks, 2);

    job.finalize_cancelled(Utc::now(), 0.7, vec![sample_result("AAA")]);
    assert_eq!(job.execution_time, Some(0.7));
    assert_eq!(job.found_stocks, 1);

    // Frozen: nothing moves anymore
    job.record_outcome(&reject_outcome("CCC", 2));
    assert_eq!(job.screened_stocks, 2);
}

#[test]
fn cancel_twice_reports_terminal() {
    let mut job = new_job();
    assert!(job.cancel(Utc::now()));
    assert!(!job.cancel(Utc::now()));
}

#[test]
fn fail_records_the_message() {
    let mut job = new_job();
    job.mark_running(Utc::now());
    job.fail(Utc::now(), "symbol resolution failed".to_string());
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.error_message.as_deref(),
        Some("symbol resolution failed")
    );
    assert!(job.completed_at.is_some());
}

#[test]
fn progress_uses_floor_division() {
    let mut job = new_job();
    job.mark_running(Utc::now());
    job.set_total(7);
    job.record_outcome(&reject_outcome("AAA", 0));
    // 100 * 1 / 7 = 14.28 -> 14
    assert_eq!(job.progress, 14);
}
