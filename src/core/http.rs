//! HTTP gateway over the screening engine, using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use crate::core::export;
use crate::jobs::orchestrator::{JobError, ScreeningOrchestrator};
use crate::jobs::types::{JobStatus, JobSummary};
use crate::metrics::Metrics;
use crate::models::{ScreeningConfig, ScreeningRequest};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ScreeningOrchestrator>,
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "screenix-screening-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Map engine errors to status codes with a detail body
fn error_response(err: JobError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        JobError::NotFound(_) => StatusCode::NOT_FOUND,
        JobError::Invalid(_) | JobError::AlreadyTerminal(_) | JobError::NotCompleted(_) => {
            StatusCode::BAD_REQUEST
        }
        JobError::Resolution(_) | JobError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "detail": err.to_string() })))
}

#[derive(Debug, Deserialize)]
struct RunScreeningBody {
    request: ScreeningRequest,
    #[serde(default)]
    config: Option<ScreeningConfig>,
}

#[derive(Debug, Serialize)]
struct RunScreeningResponse {
    job_id: String,
    status: JobStatus,
}

/// Start a new screening job
async fn run_screening(
    State(state): State<AppState>,
    Json(body): Json<RunScreeningBody>,
) -> Result<Json<RunScreeningResponse>, (StatusCode, Json<Value>)> {
    let job_id = state
        .orchestrator
        .submit(body.request, body.config)
        .await
        .map_err(error_response)?;

    Ok(Json(RunScreeningResponse {
        job_id,
        status: JobStatus::Pending,
    }))
}

/// Poll the status of a screening job
async fn get_screening_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobSummary>, (StatusCode, Json<Value>)> {
    let job = state
        .orchestrator
        .get_status(&job_id)
        .await
        .map_err(error_response)?;
    Ok(Json(JobSummary::from(&job)))
}

/// Fetch the results of a completed screening job
async fn get_screening_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let results = state
        .orchestrator
        .get_results(&job_id)
        .await
        .map_err(error_response)?;
    let job = state
        .orchestrator
        .get_status(&job_id)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "job_id": job.job_id,
        "status": job.status,
        "results": results,
        "total_found": job.found_stocks,
        "execution_time": job.execution_time,
        "config_used": job.config,
    })))
}

/// Cancel a pending or running screening job
async fn cancel_screening(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .orchestrator
        .cancel(&job_id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "message": "Job cancelled successfully" })))
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    #[serde(default = "default_export_format")]
    format: String,
}

fn default_export_format() -> String {
    "csv".to_string()
}

/// Download the results of a completed job as CSV or JSON
async fn export_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let results = state
        .orchestrator
        .get_results(&job_id)
        .await
        .map_err(error_response)?;

    if results.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "No results available" })),
        ));
    }

    let (content, content_type, extension) = match query.format.as_str() {
        "csv" => (
            export::results_to_csv(&results).map_err(|e| {
                error!(job_id = %job_id, error = %e, "CSV export failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": e.to_string() })),
                )
            })?,
            "text/csv",
            "csv",
        ),
        "json" => (
            export::results_to_json(&results).map_err(|e| {
                error!(job_id = %job_id, error = %e, "JSON export failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": e.to_string() })),
                )
            })?,
            "application/json",
            "json",
        ),
        other => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": format!("unsupported export format: {}", other) })),
            ))
        }
    };

    let disposition = format!(
        "attachment; filename=screening_results_{}.{}",
        job_id, extension
    );
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

fn default_history_limit() -> usize {
    10
}

/// List past screening jobs, newest first
async fn get_screening_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<JobSummary>> {
    let limit = query.limit.clamp(1, 100);
    Json(state.orchestrator.list_history(limit, query.offset).await)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/screening/run", post(run_screening))
        .route("/api/screening/status/{job_id}", get(get_screening_status))
        .route(
            "/api/screening/results/{job_id}",
            get(get_screening_results),
        )
        .route("/api/screening/cancel/{job_id}", delete(cancel_screening))
        .route("/api/screening/export/{job_id}", get(export_results))
        .route("/api/screening/history", get(get_screening_history))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
