//! Prometheus metrics for the HTTP surface and the screening engine

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

/// Metric handles backed by a per-instance registry (so tests can spin
/// up independent servers without duplicate-registration errors)
pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub jobs_submitted_total: IntCounter,
    pub jobs_active: IntGauge,
    pub symbols_screened_total: IntCounter,
    pub stocks_found_total: IntCounter,
    pub screening_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let jobs_submitted_total =
            IntCounter::new("jobs_submitted_total", "Screening jobs submitted")?;
        let jobs_active = IntGauge::new("jobs_active", "Screening jobs currently executing")?;
        let symbols_screened_total = IntCounter::new(
            "symbols_screened_total",
            "Symbols screened across all jobs (pass, reject or error)",
        )?;
        let stocks_found_total =
            IntCounter::new("stocks_found_total", "Symbols that matched their criteria")?;
        let screening_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "screening_duration_seconds",
                "Wall-clock duration of screening jobs in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(jobs_submitted_total.clone()))?;
        registry.register(Box::new(jobs_active.clone()))?;
        registry.register(Box::new(symbols_screened_total.clone()))?;
        registry.register(Box::new(stocks_found_total.clone()))?;
        registry.register(Box::new(screening_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            jobs_submitted_total,
            jobs_active,
            symbols_screened_total,
            stocks_found_total,
            screening_duration_seconds,
        })
    }

    /// Render the registry in the Prometheus text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("non-utf8 metrics output: {}", e)))
    }
}
