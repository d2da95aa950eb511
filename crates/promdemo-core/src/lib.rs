//! promdemo core: error types and the in-process metrics model.
//!
//! This crate holds the metric registry, its instruments, and the text
//! exposition encoder. It carries no HTTP or runtime dependencies so the
//! registry can be exercised directly from tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `DemoError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{DemoError, Result};
