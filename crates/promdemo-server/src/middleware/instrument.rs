//! Request instrumentation: duration, size, and count.
//!
//! Sits outside the auth layer, so rejected requests are recorded too.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use promdemo_core::metrics::CounterVec;

use crate::app_state::AppState;

/// Layer state: app handle plus the `handler` label value for the route.
#[derive(Clone)]
pub struct Instrumented {
    pub app: AppState,
    pub handler: &'static str,
}

impl Instrumented {
    pub fn new(app: &AppState, handler: &'static str) -> Self {
        Self {
            app: app.clone(),
            handler,
        }
    }
}

/// Record duration and size histograms plus the request counter.
pub async fn instrument(State(ctx): State<Instrumented>, req: Request, next: Next) -> Response {
    let method = method_label(req.method());
    let size = approx_request_size(&req);
    let start = Instant::now();

    let resp = next.run(req).await;

    let m = ctx.app.metrics();
    match m.request_duration.with_labels(&[ctx.handler, method.as_str()]) {
        Ok(h) => h.observe_duration(start.elapsed()),
        Err(e) => tracing::warn!(error = %e, "duration not recorded"),
    }
    match m.request_size.with_labels(&[ctx.handler, method.as_str()]) {
        Ok(h) => h.observe(size as f64),
        Err(e) => tracing::warn!(error = %e, "size not recorded"),
    }
    count(&m.requests, &method, resp.status());
    resp
}

/// Request counter only (used for `/metrics` on the main listener).
pub async fn count_requests(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let method = method_label(req.method());
    let resp = next.run(req).await;
    count(&app.metrics().requests, &method, resp.status());
    resp
}

fn count(requests: &CounterVec, method: &str, status: StatusCode) {
    match requests.with_labels(&[method, status.as_str()]) {
        Ok(c) => c.inc(),
        Err(e) => tracing::warn!(error = %e, "request not counted"),
    }
}

pub fn method_label(m: &Method) -> String {
    m.as_str().to_ascii_lowercase()
}

/// Approximate wire size of the request head plus declared body length.
pub fn approx_request_size(req: &Request) -> usize {
    let mut size = req.method().as_str().len() + req.uri().to_string().len();
    for (name, value) in req.headers() {
        size += name.as_str().len() + value.len();
    }
    let content_length = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    size + content_length
}
