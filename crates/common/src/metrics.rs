//! Prometheus HTTP metrics
//!
//! Each HTTP app owns its own [`Registry`] instead of the process-wide default
//! one, so a backend and a front end (or several test apps) can live in the
//! same process without duplicate-registration errors.

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Request duration buckets, in seconds.
pub const DURATION_BUCKETS: [f64; 7] = [0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0];

const LABELS: [&str; 3] = ["method", "endpoint", "status"];

/// Request counter and latency histogram labelled by method, endpoint and status.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl HttpMetrics {
    /// Register `{prefix}_http_requests_total` and
    /// `{prefix}_http_request_duration_seconds` in a fresh registry,
    /// together with the process collector where the platform supports it.
    pub fn new(prefix: &str) -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                format!("{prefix}_http_requests_total"),
                "Total number of HTTP requests",
            ),
            &LABELS,
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                format!("{prefix}_http_request_duration_seconds"),
                "Duration of HTTP requests in seconds",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &LABELS,
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        register_process_collector(&registry)?;

        Ok(Self { registry, requests_total, request_duration })
    }

    pub fn observe(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        let labels = [method, endpoint, status.as_str()];
        self.requests_total.with_label_values(&labels).inc();
        self.request_duration
            .with_label_values(&labels)
            .observe(elapsed.as_secs_f64());
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(target_os = "linux")]
fn register_process_collector(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))
}

#[cfg(not(target_os = "linux"))]
fn register_process_collector(_registry: &Registry) -> prometheus::Result<()> {
    Ok(())
}

/// Plain request counter used by the static front-end server.
#[derive(Clone)]
pub struct RequestCounter {
    registry: Registry,
    requests_total: IntCounter,
}

impl RequestCounter {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let requests_total = IntCounter::new(
            "http_requests_total",
            "The total number of HTTP requests",
        )?;
        registry.register(Box::new(requests_total.clone()))?;
        Ok(Self { registry, requests_total })
    }

    pub fn inc(&self) {
        self.requests_total.inc();
    }

    pub fn get(&self) -> u64 {
        self.requests_total.get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Axum middleware: time the request and record it once the response is ready.
pub async fn track_http_metrics(
    State(metrics): State<HttpMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let endpoint = req.uri().path().to_string();

    let response = next.run(req).await;

    metrics.observe(&method, &endpoint, response.status().as_u16(), start.elapsed());
    response
}

/// Axum middleware: count every request except scrapes of `/metrics` itself.
pub async fn count_requests(
    State(counter): State<RequestCounter>,
    req: Request,
    next: Next,
) -> Response {
    if req.uri().path() != "/metrics" {
        counter.inc();
    }
    next.run(req).await
}

/// Encode a registry in the Prometheus text exposition format.
pub fn encode_metrics(registry: &Registry) -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "metrics encode error");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    match String::from_utf8(buffer) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        ),
    }
}

/// `encode_metrics` wrapped as a response with the exposition content type.
pub fn metrics_response(registry: &Registry) -> Response {
    let (status, body) = encode_metrics(registry);
    if status != StatusCode::OK {
        return (status, body).into_response();
    }
    let content_type = TextEncoder::new().format_type().to_string();
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}
