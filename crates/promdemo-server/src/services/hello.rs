//! `/`: greeting with simulated latency.

use std::time::Duration;

use axum::{extract::State, http::Method};
use promdemo_core::error::DemoError;
use rand::Rng;

use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn hello(State(app): State<AppState>, method: Method) -> Result<&'static str, ApiError> {
    if method != Method::GET {
        return Err(DemoError::MethodNotAllowed.into());
    }

    let max = app.cfg().simulator.hello_max_delay_ms;
    if max > 0 {
        let ms = rand::thread_rng().gen_range(0..max);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
    Ok("Hello!")
}
