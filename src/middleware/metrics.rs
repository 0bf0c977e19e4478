use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram},
};

use crate::logging::{create_counter, create_histogram};

/// Route label for requests no route matched
pub const UNMATCHED_ROUTE: &str = "unmatched";

// Instruments are built on first use so they bind to the meter provider
// installed by init_telemetry.
static REQUEST_COUNTER: Lazy<Counter<u64>> =
    Lazy::new(|| create_counter("http_requests_total", "Total number of HTTP requests"));

static REQUEST_DURATION: Lazy<Histogram<f64>> = Lazy::new(|| {
    create_histogram(
        "http_request_duration_seconds",
        "HTTP request latency in seconds",
    )
});

/// Route template the request matched (`/api/viewset/todos/:pk`), never the
/// concrete path, so label sets stay bounded by the number of routes.
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Records a request counter and latency histogram per method, route and status
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = route_label(&request);

    let response = next.run(request).await;

    let attributes = [
        KeyValue::new("http.method", method),
        KeyValue::new("http.route", route),
        KeyValue::new("http.status_code", i64::from(response.status().as_u16())),
    ];
    REQUEST_COUNTER.add(1, &attributes);
    REQUEST_DURATION.record(started.elapsed().as_secs_f64(), &attributes);

    response
}
