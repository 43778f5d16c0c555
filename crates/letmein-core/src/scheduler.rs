// ── Fixed-interval scheduler ──
//
// Runs a cycle, sleeps `interval`, repeats. Cycles never overlap: the
// next one starts only after the previous returned. Cancellation is
// observed between cycles, so a running cycle always finishes.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::SyncEngine;
use crate::gateway::ControllerGateway;
use crate::report::log_cycle_error;

/// Totals for one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub cycles: u64,
    /// Cycles that aborted or finished with item failures.
    pub failed_cycles: u64,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    cancel: CancellationToken,
    max_cycles: Option<u64>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
            max_cycles: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Stop after `n` cycles.
    pub fn with_max_cycles(mut self, n: u64) -> Self {
        self.max_cycles = Some(n);
        self
    }

    /// Token that stops the loop once the current cycle finishes.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run<G: ControllerGateway>(&self, engine: &SyncEngine<G>) -> SchedulerSummary {
        let mut summary = SchedulerSummary::default();
        info!(interval = ?self.interval, "starting reconciliation loop");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            summary.cycles += 1;
            match engine.run_cycle().await {
                Ok(report) => {
                    report.log();
                    if report.has_failures() {
                        summary.failed_cycles += 1;
                    }
                }
                Err(e) => {
                    log_cycle_error(&e);
                    summary.failed_cycles += 1;
                }
            }

            if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                break;
            }

            debug!(interval = ?self.interval, "sleeping until next cycle");
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(
            cycles = summary.cycles,
            failed = summary.failed_cycles,
            "reconciliation loop stopped"
        );
        summary
    }
}
