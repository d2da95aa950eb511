//! Business endpoints.
//!
//! Each handler dispatches on the HTTP method itself so unsupported methods
//! get the same plain-text 405 as every other error.

pub mod cpu;
pub mod hd;
pub mod hello;

use axum::body::Body;
use bytes::Bytes;
use promdemo_core::error::{DemoError, Result};

/// Upper bound on request bodies read by business handlers.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Read the full body as UTF-8 text.
pub(crate) async fn read_body_text(body: Body) -> Result<String> {
    let bytes: Bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| DemoError::BodyRead(e.to_string()))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| DemoError::InvalidInput("body is not valid utf-8".into()))
}
