//! Driver Loop - Fixed-interval Polling with Per-cycle Isolation
//!
//! Runs one strategy cycle, sleeps `interval` on success or `fallback`
//! on failure, and repeats until the shutdown signal fires. Errors are
//! logged with their kind and never end the loop. There is no retry
//! budget and no backoff escalation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::threshold::Action;
use crate::error::{ErrorKind, ExchangeResult};

/// Summary of one successful cycle, for logging and metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleReport {
  /// Price observed, if the strategy looks at one.
  pub price: Option<f64>,
  /// Decision taken, if the strategy makes one.
  pub action: Option<Action>,
  /// Whether a position is tracked after the cycle.
  pub position_open: bool,
}

/// One unit of work the driver repeats.
#[async_trait]
pub trait Cycle: Send {
  async fn run_cycle(&mut self) -> ExchangeResult<CycleReport>;
}

/// What happened in a single driver step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
  Completed(CycleReport),
  Failed(ErrorKind),
}

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTiming {
  /// Sleep after a successful cycle.
  pub interval: Duration,
  /// Sleep after a failed cycle.
  pub fallback: Duration,
}

impl Default for DriverTiming {
  fn default() -> Self {
    Self {
      interval: Duration::from_secs(10),
      fallback: Duration::from_secs(5),
    }
  }
}

pub struct Driver<C: Cycle> {
  cycle: C,
  timing: DriverTiming,
  metrics: Option<Arc<MetricsRegistry>>,
  cycles_run: u64,
}

impl<C: Cycle> Driver<C> {
  pub const fn new(cycle: C, timing: DriverTiming) -> Self {
    Self {
      cycle,
      timing,
      metrics: None,
      cycles_run: 0,
    }
  }

  #[must_use]
  pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
    self.metrics = Some(metrics);
    self
  }

  pub const fn cycle(&self) -> &C {
    &self.cycle
  }

  pub const fn cycles_run(&self) -> u64 {
    self.cycles_run
  }

  /// Sleep to apply after `outcome`.
  pub const fn delay_after(&self, outcome: &StepOutcome) -> Duration {
    match outcome {
      StepOutcome::Completed(_) => self.timing.interval,
      StepOutcome::Failed(_) => self.timing.fallback,
    }
  }

  /// Run exactly one cycle, absorbing any error.
  pub async fn step(&mut self) -> StepOutcome {
    self.cycles_run += 1;

    match self.cycle.run_cycle().await {
      Ok(report) => {
        if let Some(metrics) = &self.metrics {
          metrics.record_success(report.action);
          if let Some(price) = report.price {
            metrics.last_price.set(price);
          }
          metrics.position_open.set(i64::from(report.position_open));
        }
        StepOutcome::Completed(report)
      }
      Err(e) => {
        let kind = e.kind();
        error!(error_kind = %kind, error = %e, cycle = self.cycles_run, "Cycle failed");
        if let Some(metrics) = &self.metrics {
          metrics.record_failure(kind);
        }
        StepOutcome::Failed(kind)
      }
    }
  }

  /// Loop until `shutdown_rx` fires, then hand the strategy back.
  #[instrument(skip_all, name = "driver_loop")]
  pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) -> C {
    info!(
      interval_s = self.timing.interval.as_secs(),
      fallback_s = self.timing.fallback.as_secs(),
      "Driver started"
    );

    loop {
      let outcome = self.step().await;
      let delay = self.delay_after(&outcome);

      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => {
          info!(cycles = self.cycles_run, "Driver received shutdown signal");
          break;
        }
        () = tokio::time::sleep(delay) => {}
      }
    }

    self.cycle
  }
}

/// Why the wait on a spawned driver ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverExit {
  /// `shutdown` resolved first; the task is still running.
  Shutdown,
  /// The task returned without being asked to.
  Stopped,
  /// The task panicked or was cancelled.
  Crashed(String),
}

/// Wait for `shutdown` or for the driver task to end on its own,
/// whichever comes first.
pub async fn wait_for_exit<T, F>(handle: &mut JoinHandle<T>, shutdown: F) -> DriverExit
where
  F: Future<Output = ()>,
{
  tokio::select! {
    () = shutdown => DriverExit::Shutdown,
    joined = handle => match joined {
      Ok(_) => DriverExit::Stopped,
      Err(e) => DriverExit::Crashed(e.to_string()),
    },
  }
}
