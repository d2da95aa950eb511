//! Shared application state.
//!
//! Built once at startup: the registry, every metric family, and the
//! resolved Basic auth credentials. Errors here abort startup.

use std::sync::Arc;

use promdemo_core::error::Result;
use promdemo_core::metrics::Registry;

use crate::config::AppConfig;
use crate::middleware::auth::Credentials;
use crate::obs::metrics::AppMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    registry: Arc<Registry>,
    metrics: AppMetrics,
    auth: Option<Credentials>,
}

impl AppState {
    /// Build application state on a fresh registry.
    pub fn new(cfg: AppConfig) -> Result<Self> {
        Self::with_registry(cfg, Arc::new(Registry::new()))
    }

    /// Build application state on a caller-supplied registry.
    pub fn with_registry(cfg: AppConfig, registry: Arc<Registry>) -> Result<Self> {
        let metrics = AppMetrics::register(&registry, cfg.simulator.enabled)?;

        let auth = Credentials::parse(&cfg.server.basic_auth);
        if auth.is_none() && !cfg.server.basic_auth.is_empty() {
            tracing::warn!("basic auth value is not <user>:<password>; authentication disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                metrics,
                auth,
            }),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.inner.metrics
    }

    pub fn auth(&self) -> Option<&Credentials> {
        self.inner.auth.as_ref()
    }

    /// `/metrics` lives on its own listener.
    pub fn has_metrics_listener(&self) -> bool {
        !self.inner.cfg.server.listen_metrics.is_empty()
    }
}
