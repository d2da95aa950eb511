//! promdemo server
//!
//! - Business endpoints: /cpu, /hd, and / with --simulate
//! - Ops endpoints: /-/healthy, /-/ready, /metrics
//! - Optional Basic auth and a dedicated metrics listener

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use promdemo_server::{cli::Cli, server};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let result = match Cli::parse().into_config() {
        Ok(cfg) => server::run(cfg).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.client_code().as_str(), "fatal");
            ExitCode::FAILURE
        }
    }
}
