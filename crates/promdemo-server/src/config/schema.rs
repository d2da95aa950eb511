use std::net::SocketAddr;

use serde::Deserialize;
use promdemo_core::error::{DemoError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub simulator: SimulatorSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            simulator: SimulatorSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DemoError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.simulator.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Empty: `/metrics` is served on `listen`.
    #[serde(default)]
    pub listen_metrics: String,

    /// `user:password`; anything else leaves auth disabled.
    #[serde(default)]
    pub basic_auth: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            listen_metrics: String::new(),
            basic_auth: String::new(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        self.metrics_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_addr("server.listen", &self.listen)
    }

    pub fn metrics_addr(&self) -> Result<Option<SocketAddr>> {
        if self.listen_metrics.is_empty() {
            return Ok(None);
        }
        parse_addr("server.listen_metrics", &self.listen_metrics).map(Some)
    }
}

fn parse_addr(field: &str, s: &str) -> Result<SocketAddr> {
    s.parse()
        .map_err(|e| DemoError::Config(format!("{field} must be a valid SocketAddr ({s:?}): {e}")))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_stage_error_probability")]
    pub stage_error_probability: f64,

    /// Upper bound (exclusive) of the `/` handler's artificial latency.
    #[serde(default = "default_hello_max_delay_ms")]
    pub hello_max_delay_ms: u64,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_interval_ms(),
            stage_error_probability: default_stage_error_probability(),
            hello_max_delay_ms: default_hello_max_delay_ms(),
        }
    }
}

impl SimulatorSection {
    pub fn validate(&self) -> Result<()> {
        if !(10..=3_600_000).contains(&self.interval_ms) {
            return Err(DemoError::Config(
                "simulator.interval_ms must be between 10 and 3600000".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.stage_error_probability) {
            return Err(DemoError::Config(
                "simulator.stage_error_probability must be between 0 and 1".into(),
            ));
        }
        if self.hello_max_delay_ms > 60_000 {
            return Err(DemoError::Config(
                "simulator.hello_max_delay_ms must not exceed 60000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".into()
}
fn default_interval_ms() -> u64 {
    1000
}
// same rate as floor(rand[0,100) / 97)
fn default_stage_error_probability() -> f64 {
    0.03
}
fn default_hello_max_delay_ms() -> u64 {
    1000
}
