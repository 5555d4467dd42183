//! Integration tests for the HTTP gateway
//!
//! Drives the full submit/poll/results/export/cancel surface over
//! fixture providers.

#[path = "api_server/test_utils.rs"]
mod api_server_test_utils;

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use api_server_test_utils::TestApiServer;
use screenix::models::IndexType;
use screenix::services::market_data::FixtureMarketDataProvider;
use test_utils::{balanced_candles, rising_candles, FixtureSymbolProvider};

async fn screener_server() -> TestApiServer {
    let symbols = Arc::new(
        FixtureSymbolProvider::new().with_index(IndexType::Nifty50, &["AAA", "BBB", "CCC"]),
    );
    let market_data = Arc::new(
        FixtureMarketDataProvider::new()
            .with_series("AAA", balanced_candles(250))
            .with_series("BBB", rising_candles(250))
            .with_failure("CCC"),
    );
    TestApiServer::new(symbols, market_data).await
}

fn rsi_run_body() -> Value {
    json!({
        "request": {
            "index_type": "1",
            "criteria": "5",
            "rsi_min": 30,
            "rsi_max": 70
        },
        "config": { "pacing_ms": 0 }
    })
}

async fn wait_for_completed(app: &TestApiServer, job_id: &str) -> Value {
    for _ in 0..500 {
        let response = app
            .server
            .get(&format!("/api/screening/status/{}", job_id))
            .await;
        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        match body["status"].as_str() {
            Some("completed") => return body,
            Some("failed") | Some("cancelled") => {
                panic!("job ended in unexpected state: {}", body)
            }
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("job {} did not complete in time", job_id);
}

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = screener_server().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "screenix-screening-engine");
}

#[tokio::test]
async fn metrics_endpoint_exposes_engine_counters() {
    let app = screener_server().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("jobs_submitted_total"));
    assert!(body.contains("symbols_screened_total"));
}

#[tokio::test]
async fn run_status_results_flow() {
    let app = screener_server().await;

    let response = app
        .server
        .post("/api/screening/run")
        .json(&rsi_run_body())
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    let job_id = body["job_id"].as_str().expect("job id").to_string();

    let status = wait_for_completed(&app, &job_id).await;
    assert_eq!(status["total_stocks"], 3);
    assert_eq!(status["screened_stocks"], 3);
    assert_eq!(status["found_stocks"], 1);
    assert_eq!(status["progress"], 100);
    assert!(status.get("error_message").is_none());

    let response = app
        .server
        .get(&format!("/api/screening/results/{}", job_id))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_found"], 1);
    assert_eq!(body["results"][0]["stock"], "AAA");
    assert!(body["execution_time"].as_f64().is_some());
    assert_eq!(body["config_used"]["pacing_ms"], 0);
}

#[tokio::test]
async fn empty_universe_job_completes_and_serves_results() {
    let symbols = Arc::new(FixtureSymbolProvider::new());
    let market_data = Arc::new(FixtureMarketDataProvider::new());
    let app = TestApiServer::new(symbols, market_data).await;

    let response = app
        .server
        .post("/api/screening/run")
        .json(&json!({
            "request": { "index_type": "0", "criteria": "0" },
            "config": { "pacing_ms": 0 }
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let job_id = body["job_id"].as_str().expect("job id").to_string();

    wait_for_completed(&app, &job_id).await;
    let response = app
        .server
        .get(&format!("/api/screening/results/{}", job_id))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn invalid_rsi_bounds_are_rejected_at_submit() {
    let app = screener_server().await;
    let response = app
        .server
        .post("/api/screening/run")
        .json(&json!({
            "request": {
                "index_type": "1",
                "criteria": "5",
                "rsi_min": 70,
                "rsi_max": 30
            }
        }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["detail"]
        .as_str()
        .expect("detail message")
        .contains("rsi_max"));

    // No job was created
    let history = app.server.get("/api/screening/history").await;
    let body: Value = history.json();
    assert_eq!(body.as_array().expect("history array").len(), 0);
}

#[tokio::test]
async fn unknown_jobs_return_404() {
    let app = screener_server().await;
    let missing = "00000000-0000-0000-0000-000000000000";

    let response = app
        .server
        .get(&format!("/api/screening/status/{}", missing))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .server
        .delete(&format!("/api/screening/cancel/{}", missing))
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .server
        .get(&format!("/api/screening/results/{}", missing))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn cancelling_a_completed_job_is_a_bad_request() {
    let app = screener_server().await;
    let response = app
        .server
        .post("/api/screening/run")
        .json(&rsi_run_body())
        .await;
    let body: Value = response.json();
    let job_id = body["job_id"].as_str().expect("job id").to_string();
    wait_for_completed(&app, &job_id).await;

    let response = app
        .server
        .delete(&format!("/api/screening/cancel/{}", job_id))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["detail"]
        .as_str()
        .expect("detail message")
        .contains("terminal"));
}

#[tokio::test]
async fn csv_export_downloads_an_attachment() {
    let app = screener_server().await;
    let response = app
        .server
        .post("/api/screening/run")
        .json(&rsi_run_body())
        .await;
    let body: Value = response.json();
    let job_id = body["job_id"].as_str().expect("job id").to_string();
    wait_for_completed(&app, &job_id).await;

    let response = app
        .server
        .get(&format!("/api/screening/export/{}", job_id))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/csv"
    );
    assert!(response
        .header("content-disposition")
        .to_str()
        .unwrap()
        .contains(&job_id));

    let body = response.text();
    assert!(body.starts_with("stock,"));
    assert!(body.contains("AAA"));
}

#[tokio::test]
async fn json_export_serves_the_result_array() {
    let app = screener_server().await;
    let response = app
        .server
        .post("/api/screening/run")
        .json(&rsi_run_body())
        .await;
    let body: Value = response.json();
    let job_id = body["job_id"].as_str().expect("job id").to_string();
    wait_for_completed(&app, &job_id).await;

    let response = app
        .server
        .get(&format!("/api/screening/export/{}?format=json", job_id))
        .await;
    assert_eq!(response.status_code(), 200);
    let parsed: Value = serde_json::from_str(&response.text()).expect("valid JSON export");
    assert_eq!(parsed[0]["stock"], "AAA");
}

#[tokio::test]
async fn unsupported_export_format_is_rejected() {
    let app = screener_server().await;
    let response = app
        .server
        .post("/api/screening/run")
        .json(&rsi_run_body())
        .await;
    let body: Value = response.json();
    let job_id = body["job_id"].as_str().expect("job id").to_string();
    wait_for_completed(&app, &job_id).await;

    let response = app
        .server
        .get(&format!("/api/screening/export/{}?format=xml", job_id))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn history_pages_through_jobs() {
    let app = screener_server().await;

    for _ in 0..3 {
        let response = app
            .server
            .post("/api/screening/run")
            .json(&rsi_run_body())
            .await;
        let body: Value = response.json();
        let job_id = body["job_id"].as_str().expect("job id").to_string();
        wait_for_completed(&app, &job_id).await;
    }

    let response = app.server.get("/api/screening/history?limit=2").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body.as_array().expect("history array").len(), 2);

    let response = app
        .server
        .get("/api/screening/history?limit=2&offset=2")
        .await;
    let body: Value = response.json();
    assert_eq!(body.as_array().expect("history array").len(), 1);
}
