//! Metric families owned by the service.
//!
//! Families live on the registry held by `AppState`; the `/metrics` handler
//! renders that registry.

pub mod metrics;
