//! HTTP mapping for [`DemoError`].

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use promdemo_core::error::DemoError;

pub const AUTH_REALM: &str = "Basic realm=\"promdemo\"";

/// Response wrapper; request-level errors end here and never reach the registry.
#[derive(Debug)]
pub struct ApiError(pub DemoError);

impl From<DemoError> for ApiError {
    fn from(e: DemoError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DemoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DemoError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            DemoError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self.0 {
            DemoError::InvalidInput(_) => "Invalid request",
            DemoError::BodyRead(_) => "Error processing request",
            DemoError::MethodNotAllowed => "Method not allowed",
            DemoError::Unauthorized => "Unauthorized.",
            _ => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self.0, code = self.0.client_code().as_str(), "request failed");
        } else {
            tracing::debug!(error = %self.0, code = self.0.client_code().as_str(), "request rejected");
        }

        let body = format!("{}\n", self.message());
        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, AUTH_REALM)], body).into_response();
        }
        (status, body).into_response()
    }
}
