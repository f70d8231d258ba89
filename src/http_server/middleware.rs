//! Request logging middleware
//!
//! One `REQUEST` log line per request with method, path, status, latency,
//! and request ID. The ID is taken from `x-request-id` when the client sends
//! one and echoed back on the response.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::observability::{Event, Logger, Severity};

use super::state::CatalogState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn request_logger(
    State(state): State<Arc<CatalogState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let started = Instant::now();
    let mut response = next.run(request).await;
    let latency_ms = started.elapsed().as_millis();

    let status = response.status();
    state.metrics.increment_requests();
    if status.is_client_error() || status.is_server_error() {
        state.metrics.increment_request_errors();
    }

    let status_code = status.as_u16().to_string();
    let latency = latency_ms.to_string();
    let fields: [(&str, &str); 5] = [
        ("method", &method),
        ("path", &path),
        ("status", &status_code),
        ("latency_ms", &latency),
        ("request_id", &request_id),
    ];
    if status.is_server_error() {
        Logger::log_stderr(Severity::Error, Event::Request.as_str(), &fields);
    } else {
        Logger::log(Severity::Info, Event::Request.as_str(), &fields);
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
