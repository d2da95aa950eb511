//! Axum router wiring.
//!
//! Business routes: instrumentation -> auth -> handler.
//! `/-/healthy` and `/-/ready` are neither gated nor instrumented.

use axum::{
    middleware::from_fn_with_state,
    routing::{any, get},
    Router,
};

use crate::{app_state::AppState, middleware, ops, services};

/// Main listener routes. `/metrics` is included unless a dedicated metrics
/// listener is configured.
pub fn build_router(state: AppState) -> Router {
    let auth = from_fn_with_state(state.clone(), middleware::require_basic_auth);
    let instrumented = |handler: &'static str| {
        from_fn_with_state(
            middleware::Instrumented::new(&state, handler),
            middleware::instrument,
        )
    };

    let mut router = Router::new()
        .route("/-/healthy", get(ops::healthy))
        .route("/-/ready", get(ops::ready))
        .route(
            "/cpu",
            any(services::cpu::cpu)
                .layer(auth.clone())
                .layer(instrumented("cpu")),
        )
        .route(
            "/hd",
            any(services::hd::hd)
                .layer(auth.clone())
                .layer(instrumented("hd")),
        );

    if state.cfg().simulator.enabled {
        router = router.route(
            "/",
            any(services::hello::hello)
                .layer(auth.clone())
                .layer(instrumented("hello")),
        );
    }

    if !state.has_metrics_listener() {
        router = router.route(
            "/metrics",
            get(ops::metrics)
                .layer(auth)
                .layer(from_fn_with_state(state.clone(), middleware::count_requests)),
        );
    }

    router.with_state(state)
}

/// Dedicated metrics listener: `/metrics` only, gated, not instrumented.
pub fn build_metrics_router(state: AppState) -> Router {
    let auth = from_fn_with_state(state.clone(), middleware::require_basic_auth);
    Router::new()
        .route("/metrics", get(ops::metrics).layer(auth))
        .with_state(state)
}
