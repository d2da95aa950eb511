//! Background business-metric simulator.
//!
//! One tokio task ticks on a fixed period and perturbs the session, order and
//! stage-error families. It stops when its oneshot fires (or the sender is
//! dropped); [`Simulator::shutdown`] waits for the task to finish so nothing
//! writes to the registry afterwards.

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use promdemo_core::error::{DemoError, Result};

use crate::config::SimulatorSection;
use crate::obs::metrics::SimMetrics;

/// Processing stages with an error counter each.
pub const STAGES: [&str; 3] = ["validation", "payment", "shipping"];

/// Apply one tick: sessions := [0,100), orders += [0,5), each stage errors
/// with probability `stage_error_probability`.
pub fn tick<R: Rng + ?Sized>(m: &SimMetrics, rng: &mut R, stage_error_probability: f64) {
    m.sessions.set(rng.gen_range(0..100u32) as f64);

    let orders = rng.gen_range(0..5u32);
    if let Err(e) = m.orders.add(orders as f64) {
        tracing::warn!(error = %e, "orders not updated");
    }

    // gen_bool panics outside [0, 1]
    let p = if stage_error_probability.is_nan() {
        0.0
    } else {
        stage_error_probability.clamp(0.0, 1.0)
    };
    for (_stage, counter) in &m.stage_counters {
        if rng.gen_bool(p) {
            counter.inc();
        }
    }
}

pub struct Simulator {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Simulator {
    /// Spawn on the current runtime. The first tick happens one period in.
    pub fn spawn(metrics: SimMetrics, cfg: &SimulatorSection) -> Self {
        let rng = StdRng::from_entropy();
        Self::spawn_with_rng(metrics, cfg, rng)
    }

    pub fn spawn_with_rng(metrics: SimMetrics, cfg: &SimulatorSection, mut rng: StdRng) -> Self {
        let (shutdown, mut rx) = oneshot::channel::<()>();
        let period = Duration::from_millis(cfg.interval_ms);
        let p = cfg.stage_error_probability;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(period_ms = period.as_millis() as u64, "simulator started");
            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = ticker.tick() => tick(&metrics, &mut rng, p),
                }
            }
            tracing::info!("simulator stopped");
        });

        Self { shutdown, task }
    }

    /// Signal the task and wait until it has exited.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .map_err(|e| DemoError::Internal(format!("simulator task failed: {e}")))
    }
}
