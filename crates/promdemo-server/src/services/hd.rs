//! `/hd`: report or record hard-disk failures per device.

use std::fmt::Write;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use promdemo_core::error::DemoError;

use super::read_body_text;
use crate::app_state::AppState;
use crate::error::ApiError;

/// Devices accepted by `POST /hd`, in report order.
pub const HD_DEVICES: [&str; 2] = ["sda", "sdb"];

pub async fn hd(State(app): State<AppState>, req: Request) -> Result<Response, ApiError> {
    let failures = &app.metrics().hd_failures;
    let method = req.method().clone();
    match method {
        Method::GET => {
            let mut out = String::new();
            for d in HD_DEVICES {
                let n = failures.with_labels(&[d])?.get();
                let _ = writeln!(out, "The number of failures for {} is {:.0}", d, n);
            }
            Ok(out.into_response())
        }
        Method::POST => {
            let body = read_body_text(req.into_body()).await?;
            let device = HD_DEVICES
                .into_iter()
                .find(|d| *d == body)
                .ok_or_else(|| DemoError::InvalidInput(format!("unknown device: {body:?}")))?;
            failures.with_labels(&[device])?.inc();
            tracing::debug!(device, "hard-disk failure recorded");
            Ok(StatusCode::OK.into_response())
        }
        _ => Err(DemoError::MethodNotAllowed.into()),
    }
}
