//! Business, ops and exposition endpoints driven in-process.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use promdemo_core::error::DemoError;
use promdemo_core::metrics::{MetricDescriptor, Registry};
use promdemo_server::app_state::AppState;
use promdemo_server::config::AppConfig;
use promdemo_server::router::{build_metrics_router, build_router};

fn setup(cfg: AppConfig) -> (AppState, Router) {
    let state = AppState::new(cfg).unwrap();
    let router = build_router(state.clone());
    (state, router)
}

fn req(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn hd_count(state: &AppState, device: &str) -> f64 {
    state.metrics().hd_failures.with_labels(&[device]).unwrap().get()
}

#[tokio::test]
async fn cpu_starts_at_initial_temperature() {
    let (_, router) = setup(AppConfig::default());
    let (status, body) = send(&router, req(Method::GET, "/cpu", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "The cpu temperature is 37.00°C\n");
}

#[tokio::test]
async fn cpu_post_then_get_round_trips_to_two_decimals() {
    let (_, router) = setup(AppConfig::default());
    for s in ["12.345", "-3", "0", "100.999", "1e2"] {
        let (status, _) = send(&router, req(Method::POST, "/cpu", s)).await;
        assert_eq!(status, StatusCode::OK, "{s:?}");

        let (_, body) = send(&router, req(Method::GET, "/cpu", "")).await;
        let expected: f64 = s.parse().unwrap();
        assert_eq!(body, format!("The cpu temperature is {:.2}°C\n", expected));
    }
}

#[tokio::test]
async fn cpu_rejects_non_numeric_body_and_keeps_value() {
    let (state, router) = setup(AppConfig::default());
    state.metrics().cpu_temp.set(40.0);

    for s in ["", "hot", "12,5", "1.2.3", " 42.5", "42.5\n"] {
        let (status, body) = send(&router, req(Method::POST, "/cpu", s)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{s:?}");
        assert_eq!(body, "Invalid request\n");
    }
    assert_eq!(state.metrics().cpu_temp.get(), 40.0);
}

#[tokio::test]
async fn cpu_rejects_oversized_body_as_processing_error() {
    let (_, router) = setup(AppConfig::default());
    let big = "1".repeat(promdemo_server::services::MAX_BODY_BYTES + 1);
    let (status, body) = send(&router, req(Method::POST, "/cpu", &big)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error processing request\n");
}

#[tokio::test]
async fn hd_rejects_oversized_body_as_processing_error() {
    let (state, router) = setup(AppConfig::default());
    let big = "s".repeat(promdemo_server::services::MAX_BODY_BYTES + 1);
    let (status, body) = send(&router, req(Method::POST, "/hd", &big)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error processing request\n");
    assert_eq!(hd_count(&state, "sda"), 0.0);
    assert_eq!(hd_count(&state, "sdb"), 0.0);
}

#[tokio::test]
async fn hd_reports_every_device() {
    let (_, router) = setup(AppConfig::default());
    let (status, body) = send(&router, req(Method::GET, "/hd", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "The number of failures for sda is 0\nThe number of failures for sdb is 0\n"
    );
}

#[tokio::test]
async fn hd_post_increments_only_that_device() {
    let (state, router) = setup(AppConfig::default());
    for device in ["sda", "sdb"] {
        let other = if device == "sda" { "sdb" } else { "sda" };
        let before_other = hd_count(&state, other);
        let before = hd_count(&state, device);

        let (status, _) = send(&router, req(Method::POST, "/hd", device)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hd_count(&state, device), before + 1.0);
        assert_eq!(hd_count(&state, other), before_other);
    }

    let (_, body) = send(&router, req(Method::GET, "/hd", "")).await;
    assert!(body.contains("The number of failures for sda is 1\n"));
    assert!(body.contains("The number of failures for sdb is 1\n"));
}

#[tokio::test]
async fn hd_rejects_unknown_device() {
    let (state, router) = setup(AppConfig::default());
    for body in ["sdc", "", "sda\n", "SDA"] {
        let (status, text) = send(&router, req(Method::POST, "/hd", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
        assert_eq!(text, "Invalid request\n");
    }
    assert_eq!(hd_count(&state, "sda"), 0.0);
    assert_eq!(hd_count(&state, "sdb"), 0.0);
}

#[tokio::test]
async fn unsupported_methods_yield_405() {
    let (_, router) = setup(AppConfig::default());
    for path in ["/cpu", "/hd"] {
        for m in [Method::PUT, Method::DELETE, Method::PATCH] {
            let (status, body) = send(&router, req(m.clone(), path, "")).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{m} {path}");
            assert_eq!(body, "Method not allowed\n");
        }
    }
}

#[tokio::test]
async fn concurrent_hd_posts_are_all_counted() {
    let (state, router) = setup(AppConfig::default());
    const K: usize = 64;

    let tasks: Vec<_> = (0..K)
        .map(|_| {
            let router = router.clone();
            tokio::spawn(async move { send(&router, req(Method::POST, "/hd", "sda")).await.0 })
        })
        .collect();
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(hd_count(&state, "sda"), K as f64);
    assert_eq!(hd_count(&state, "sdb"), 0.0);
}

#[tokio::test]
async fn health_and_ready_are_constant() {
    let (_, router) = setup(AppConfig::default());
    assert_eq!(
        send(&router, req(Method::GET, "/-/healthy", "")).await,
        (StatusCode::OK, "Healthy".to_string())
    );
    assert_eq!(
        send(&router, req(Method::GET, "/-/ready", "")).await,
        (StatusCode::OK, "Ready".to_string())
    );
}

#[tokio::test]
async fn metrics_exposes_business_and_http_families() {
    let (_, router) = setup(AppConfig::default());
    send(&router, req(Method::POST, "/hd", "sdb")).await;
    send(&router, req(Method::POST, "/cpu", "nope")).await;
    for _ in 0..3 {
        send(&router, req(Method::GET, "/cpu", "")).await;
    }

    let resp = router
        .clone()
        .oneshot(req(Method::GET, "/metrics", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.contains("# HELP cpu_temperature_celsius Current temperature of the CPU.\n"));
    assert!(text.contains("# TYPE cpu_temperature_celsius gauge\n"));
    assert!(text.contains("cpu_temperature_celsius 37\n"));
    assert!(text.contains("hd_errors_total{device=\"sda\"} 0\n"));
    assert!(text.contains("hd_errors_total{device=\"sdb\"} 1\n"));
    assert!(text.contains("http_requests_total{code=\"200\",method=\"get\"} 3\n"));
    assert!(text.contains("http_requests_total{code=\"200\",method=\"post\"} 1\n"));
    assert!(text.contains("http_requests_total{code=\"400\",method=\"post\"} 1\n"));
    assert!(text.contains(
        "http_request_duration_seconds_count{handler=\"cpu\",method=\"get\"} 3\n"
    ));
    assert!(text.contains("http_request_size_bytes_count{handler=\"hd\",method=\"post\"} 1\n"));

    let buckets: Vec<u64> = text
        .lines()
        .filter(|l| {
            l.starts_with("http_request_duration_seconds_bucket{handler=\"cpu\",method=\"get\"")
        })
        .map(|l| l.rsplit(' ').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(buckets.len(), 7);
    assert!(buckets.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*buckets.last().unwrap(), 3);
}

#[tokio::test]
async fn metrics_scrapes_on_main_listener_are_counted() {
    let (state, router) = setup(AppConfig::default());
    send(&router, req(Method::GET, "/metrics", "")).await;
    let (_, text) = send(&router, req(Method::GET, "/metrics", "")).await;
    // the second scrape sees the first one
    assert!(text.contains("http_requests_total{code=\"200\",method=\"get\"} 1\n"));
    assert_eq!(
        state
            .metrics()
            .requests
            .with_labels(&["get", "200"])
            .unwrap()
            .get(),
        2.0
    );
}

#[tokio::test]
async fn dedicated_metrics_listener_moves_metrics_route() {
    let mut cfg = AppConfig::default();
    cfg.server.listen_metrics = "127.0.0.1:9100".into();
    let (state, router) = setup(cfg);

    let (status, _) = send(&router, req(Method::GET, "/metrics", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let metrics_router = build_metrics_router(state.clone());
    let (status, text) = send(&metrics_router, req(Method::GET, "/metrics", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("# TYPE hd_errors_total counter\n"));
    // not instrumented on the dedicated listener
    assert!(!text.contains("http_requests_total{"));

    let (status, _) = send(&metrics_router, req(Method::GET, "/cpu", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hello_route_needs_simulator() {
    let (_, router) = setup(AppConfig::default());
    let (status, _) = send(&router, req(Method::GET, "/", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut cfg = AppConfig::default();
    cfg.simulator.enabled = true;
    cfg.simulator.hello_max_delay_ms = 0;
    let (state, router) = setup(cfg);
    assert_eq!(
        send(&router, req(Method::GET, "/", "")).await,
        (StatusCode::OK, "Hello!".to_string())
    );
    let (status, _) = send(&router, req(Method::POST, "/", "")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (_, text) = send(&router, req(Method::GET, "/metrics", "")).await;
    assert!(text.contains(
        "http_request_duration_seconds_count{handler=\"hello\",method=\"get\"} 1\n"
    ));
    assert!(text.contains("# TYPE sessions_active gauge\n"));
    assert!(text.contains("orders_total 0\n"));
    assert!(text.contains("stage_errors_total{stage=\"payment\"} 0\n"));
    assert!(state.metrics().sim.is_some());
}

#[tokio::test]
async fn hello_latency_stays_below_bound() {
    let mut cfg = AppConfig::default();
    cfg.simulator.enabled = true;
    cfg.simulator.hello_max_delay_ms = 20;
    let (_, router) = setup(cfg);

    let start = std::time::Instant::now();
    let (status, _) = send(&router, req(Method::GET, "/", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(start.elapsed() < std::time::Duration::from_secs(2));
}

#[test]
fn duplicate_family_fails_startup() {
    let registry = Arc::new(Registry::new());
    registry
        .register_gauge(MetricDescriptor::gauge("cpu_temperature_celsius", "taken"))
        .unwrap();

    let err = AppState::with_registry(AppConfig::default(), registry)
        .err()
        .expect("must fail");
    assert!(matches!(err, DemoError::DuplicateMetricName(ref n) if n == "cpu_temperature_celsius"));
}

#[test]
fn version_info_uses_const_labels() {
    let registry = Registry::new();
    promdemo_server::obs::metrics::register_version_info(&registry, "2024-01-01", "abc123").unwrap();
    let text = promdemo_core::metrics::encode_text(&registry.collect());
    assert!(text.contains("version_info{build_date=\"2024-01-01\",commit_id=\"abc123\"} 1\n"));
}
