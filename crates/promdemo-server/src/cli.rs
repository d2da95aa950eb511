//! Command-line flags. Flags override the optional YAML file, which overrides
//! built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use promdemo_core::error::Result;

use crate::config::{self, AppConfig};

#[derive(Debug, Default, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Listen address [default: 127.0.0.1:8080]
    #[clap(long)]
    pub listen: Option<String>,

    /// Listen address for exposing metrics (default to 'listen' if blank)
    #[clap(long = "listen-metrics")]
    pub listen_metrics: Option<String>,

    /// Basic authentication (eg <user>:<password>)
    #[clap(long = "basic-auth")]
    pub basic_auth: Option<String>,

    /// YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Run the background business-metric simulator and serve `/`
    #[clap(long)]
    pub simulate: bool,

    /// Simulator tick period in milliseconds
    #[clap(long = "simulate-interval-ms")]
    pub simulate_interval_ms: Option<u64>,
}

impl Cli {
    /// Resolve the effective, validated config.
    pub fn into_config(self) -> Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(listen) = self.listen {
            cfg.server.listen = listen;
        }
        if let Some(listen_metrics) = self.listen_metrics {
            cfg.server.listen_metrics = listen_metrics;
        }
        if let Some(basic_auth) = self.basic_auth {
            cfg.server.basic_auth = basic_auth;
        }
        if self.simulate {
            cfg.simulator.enabled = true;
        }
        if let Some(ms) = self.simulate_interval_ms {
            cfg.simulator.interval_ms = ms;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
