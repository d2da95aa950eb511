//! Shared error type across promdemo crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed request body.
    InvalidInput,
    /// Request body could not be read.
    BodyRead,
    /// HTTP method not supported on the route.
    MethodNotAllowed,
    /// Missing or wrong credentials.
    Unauthorized,
    /// Metric registration / usage error (startup misconfiguration).
    Metrics,
    /// Invalid configuration.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidInput => "INVALID_INPUT",
            ClientCode::BodyRead => "BODY_READ",
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::Unauthorized => "UNAUTHORIZED",
            ClientCode::Metrics => "METRICS",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("body read failed: {0}")]
    BodyRead(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unauthorized")]
    Unauthorized,
    #[error("duplicate metric name: {0}")]
    DuplicateMetricName(String),
    #[error("invalid metric descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("metric {name} is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("metric {name} expects {expected} label values, got {got}")]
    LabelCardinality {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("counter {name} cannot be decreased (delta={delta})")]
    NegativeIncrement { name: String, delta: f64 },
    #[error("config: {0}")]
    Config(String),
    #[error("listener {addr}: {reason}")]
    Listener { addr: String, reason: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl DemoError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            DemoError::InvalidInput(_) => ClientCode::InvalidInput,
            DemoError::BodyRead(_) => ClientCode::BodyRead,
            DemoError::MethodNotAllowed => ClientCode::MethodNotAllowed,
            DemoError::Unauthorized => ClientCode::Unauthorized,
            DemoError::DuplicateMetricName(_)
            | DemoError::InvalidDescriptor(_)
            | DemoError::KindMismatch { .. }
            | DemoError::LabelCardinality { .. }
            | DemoError::NegativeIncrement { .. } => ClientCode::Metrics,
            DemoError::Config(_) => ClientCode::Config,
            DemoError::Listener { .. } | DemoError::Internal(_) => ClientCode::Internal,
        }
    }
}
