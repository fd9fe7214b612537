//! Prometheus metrics
//!
//! Request counter, latency histogram, and in-flight gauge, recorded by a
//! middleware and exposed at `GET /metrics` in text exposition format.
//! Numeric path segments are normalized to `{id}` to bound label
//! cardinality.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

static HTTP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("http_requests_total", "Total HTTP requests processed"),
        &["method", "path", "status"],
    )
    .expect("invalid counter opts");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("counter already registered");
    counter
});

static HTTP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    let histogram = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ),
        &["method", "path"],
    )
    .expect("invalid histogram opts");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("histogram already registered");
    histogram
});

static IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    let gauge = IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")
        .expect("invalid gauge opts");
    REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("gauge already registered");
    gauge
});

/// Middleware that records request metrics.
///
/// The scrape endpoint itself is excluded so scraping doesn't inflate the
/// counters it reports.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    if path == "/metrics" {
        return next.run(req).await;
    }

    IN_FLIGHT.inc();
    let start = Instant::now();

    let response = next.run(req).await;

    IN_FLIGHT.dec();
    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_DURATION
        .with_label_values(&[&method, &path])
        .observe(start.elapsed().as_secs_f64());

    response
}

/// Handler for `GET /metrics` - Prometheus text exposition.
pub async fn metrics_handler() -> ([(&'static str, &'static str); 1], String) {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }

    (
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

/// Replace numeric path segments with a placeholder.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.parse::<i64>().is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
