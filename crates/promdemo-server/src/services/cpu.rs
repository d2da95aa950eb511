//! `/cpu`: read or set the CPU temperature gauge.

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use promdemo_core::error::DemoError;

use super::read_body_text;
use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn cpu(State(app): State<AppState>, req: Request) -> Result<Response, ApiError> {
    let method = req.method().clone();
    match method {
        Method::GET => {
            let v = app.metrics().cpu_temp.get();
            Ok(format!("The cpu temperature is {:.2}°C\n", v).into_response())
        }
        Method::POST => {
            let body = read_body_text(req.into_body()).await?;
            let v: f64 = body
                .parse()
                .map_err(|_| DemoError::InvalidInput(format!("not a number: {body:?}")))?;
            app.metrics().cpu_temp.set(v);
            tracing::debug!(value = v, "cpu temperature updated");
            Ok(StatusCode::OK.into_response())
        }
        _ => Err(DemoError::MethodNotAllowed.into()),
    }
}
