//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span, info_span};
use uuid::Uuid;

type MakeSpan = fn(&Request<Body>) -> Span;

/// Creates a tracing middleware for HTTP requests.
///
/// Every request gets an `INFO` span carrying the method, URI and a random
/// `request_id`, so log lines from services and repositories can be tied
/// back to one call. Responses are logged at `INFO` with status and latency
/// in milliseconds.
///
/// ```text
/// INFO request{method=GET uri=/api/projects?page=0 request_id=6f1c…}: finished processing request latency=4 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpan> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %Uuid::new_v4(),
    )
}
