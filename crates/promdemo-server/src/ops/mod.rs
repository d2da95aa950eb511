//! Operational HTTP endpoints.
//!
//! - `/-/healthy` : liveness
//! - `/-/ready`   : readiness
//! - `/metrics`   : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use promdemo_core::metrics::{encode_text, TEXT_CONTENT_TYPE};

use crate::app_state::AppState;

pub async fn healthy() -> impl IntoResponse {
    (StatusCode::OK, "Healthy")
}

pub async fn ready() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = encode_text(&state.registry().collect());

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
