//! Metric families exposed by the service.
//!
//! Everything is registered once on the injected [`Registry`] while building
//! [`AppMetrics`]; a name clash is a startup error.

use promdemo_core::error::Result;
use promdemo_core::metrics::{
    Counter, CounterVec, Gauge, HistogramVec, MetricDescriptor, Registry,
};

use crate::services::hd::HD_DEVICES;
use crate::simulator::STAGES;

pub const DURATION_BUCKETS: [f64; 6] = [0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
pub const SIZE_BUCKETS: [f64; 6] = [64.0, 256.0, 1024.0, 4096.0, 16384.0, 65536.0];

/// CPU gauge value before the first POST.
pub const INITIAL_CPU_TEMP: f64 = 37.0;

// Set at compile time to publish `version_info`.
const BUILD_DATE: Option<&str> = option_env!("PROMDEMO_BUILD_DATE");
const COMMIT_ID: Option<&str> = option_env!("PROMDEMO_COMMIT_ID");

#[derive(Clone)]
pub struct AppMetrics {
    // business
    pub cpu_temp: Gauge,
    pub hd_failures: CounterVec,

    // HTTP handlers
    pub request_duration: HistogramVec,
    pub request_size: HistogramVec,
    pub requests: CounterVec,

    /// Present when the simulator is enabled.
    pub sim: Option<SimMetrics>,
}

/// Families driven by the background simulator.
#[derive(Clone)]
pub struct SimMetrics {
    pub sessions: Gauge,
    pub orders: Counter,
    /// `STAGES` resolved once, in order.
    pub stage_counters: Vec<(&'static str, Counter)>,
}

impl AppMetrics {
    pub fn register(registry: &Registry, simulate: bool) -> Result<Self> {
        let cpu_temp = registry.register_gauge(MetricDescriptor::gauge(
            "cpu_temperature_celsius",
            "Current temperature of the CPU.",
        ))?;
        cpu_temp.set(INITIAL_CPU_TEMP);

        let hd_failures = registry.register_counter_vec(
            MetricDescriptor::counter("hd_errors_total", "Number of hard-disk errors.")
                .with_labels(&["device"]),
        )?;
        // Known devices show up at 0 before any failure is reported.
        for d in HD_DEVICES {
            hd_failures.with_labels(&[d])?;
        }

        let request_duration = registry.register_histogram_vec(
            MetricDescriptor::histogram(
                "http_request_duration_seconds",
                "Histogram of latencies for HTTP requests.",
                &DURATION_BUCKETS,
            )
            .with_labels(&["handler", "method"]),
        )?;
        let request_size = registry.register_histogram_vec(
            MetricDescriptor::histogram(
                "http_request_size_bytes",
                "Histogram of approximate HTTP request sizes.",
                &SIZE_BUCKETS,
            )
            .with_labels(&["handler", "method"]),
        )?;
        let requests = registry.register_counter_vec(
            MetricDescriptor::counter("http_requests_total", "Number of HTTP requests.")
                .with_labels(&["method", "code"]),
        )?;

        if let (Some(build_date), Some(commit_id)) = (BUILD_DATE, COMMIT_ID) {
            register_version_info(registry, build_date, commit_id)?;
        }

        let sim = if simulate {
            Some(SimMetrics::register(registry)?)
        } else {
            None
        };

        Ok(Self {
            cpu_temp,
            hd_failures,
            request_duration,
            request_size,
            requests,
            sim,
        })
    }
}

impl SimMetrics {
    fn register(registry: &Registry) -> Result<Self> {
        let sessions = registry.register_gauge(MetricDescriptor::gauge(
            "sessions_active",
            "Number of active user sessions.",
        ))?;
        let orders = registry.register_counter(MetricDescriptor::counter(
            "orders_total",
            "Number of orders placed.",
        ))?;
        let stage_errors = registry.register_counter_vec(
            MetricDescriptor::counter("stage_errors_total", "Number of errors per processing stage.")
                .with_labels(&["stage"]),
        )?;

        let mut stage_counters = Vec::with_capacity(STAGES.len());
        for stage in STAGES {
            stage_counters.push((stage, stage_errors.with_labels(&[stage])?));
        }

        Ok(Self {
            sessions,
            orders,
            stage_counters,
        })
    }
}

/// `version_info{build_date,commit_id} 1`.
pub fn register_version_info(registry: &Registry, build_date: &str, commit_id: &str) -> Result<Gauge> {
    let version = registry.register_gauge(
        MetricDescriptor::gauge("version_info", "Information about the app version.")
            .with_const_label("build_date", build_date)
            .with_const_label("commit_id", commit_id),
    )?;
    version.set(1.0);
    Ok(version)
}
