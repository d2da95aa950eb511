//! Route middleware: Basic auth and request instrumentation.

pub mod auth;
pub mod instrument;

pub use auth::{require_basic_auth, Credentials};
pub use instrument::{count_requests, instrument, Instrumented};
