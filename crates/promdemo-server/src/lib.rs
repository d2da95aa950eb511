//! promdemo server library entry.
//!
//! Wires the metric registry, business handlers, auth and instrumentation
//! middleware, and the optional simulator into one axum service. Consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod cli;
pub mod config;
pub mod error;
pub mod middleware;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
pub mod services;
pub mod simulator;
