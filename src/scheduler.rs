use chrono::{Datelike, Local, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::engine::ScheduleWindow;
use crate::stock_checker::{CheckReport, StockChecker};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// First cycle: seeds state, never notifies.
    Baseline,
    /// Every later cycle.
    Steady,
}

/// Jittered delay between cycles: `base + uniform(0, base)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPolicy {
    base: Duration,
}

impl IntervalPolicy {
    pub fn new(base: Duration) -> Self {
        Self { base }
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn next_delay(&self) -> Duration {
        self.next_delay_with(&mut rand::rng())
    }

    pub fn next_delay_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let base_ms = u64::try_from(self.base.as_millis()).unwrap_or(u64::MAX);
        let jitter_ms = if base_ms == 0 {
            0
        } else {
            rng.random_range(0..base_ms)
        };
        self.base.saturating_add(Duration::from_millis(jitter_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The schedule window was closed; nothing was fetched.
    Skipped,
    Completed(CheckReport),
}

pub struct PollScheduler {
    checker: StockChecker,
    window: ScheduleWindow,
    interval: IntervalPolicy,
    phase: SchedulerPhase,
    cycles_run: u64,
}

impl PollScheduler {
    pub fn new(checker: StockChecker, window: ScheduleWindow, interval: IntervalPolicy) -> Self {
        Self {
            checker,
            window,
            interval,
            phase: SchedulerPhase::Baseline,
            cycles_run: 0,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    pub fn checker(&self) -> &StockChecker {
        &self.checker
    }

    /// Runs one cycle as if the local time were `now`.
    ///
    /// The scheduler leaves the baseline phase after its first cycle, even when
    /// that cycle was skipped by the window.
    pub async fn run_cycle_at<T: Datelike + Timelike>(&mut self, now: &T) -> CycleOutcome {
        let outcome = if self.window.should_run(now) {
            let send_notifications = self.phase == SchedulerPhase::Steady;
            let report = self.checker.check_all(send_notifications).await;
            debug!(
                "Cycle {} finished in {} ms: {} transition(s), {} fetch failure(s)",
                self.cycles_run + 1,
                report.total_time_ms,
                report.transitions,
                report.fetch_failures
            );
            CycleOutcome::Completed(report)
        } else {
            debug!("Outside the configured schedule window, skipping cycle");
            CycleOutcome::Skipped
        };

        self.cycles_run += 1;
        self.phase = SchedulerPhase::Steady;
        outcome
    }

    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let now = Local::now().naive_local();
        self.run_cycle_at(&now).await
    }

    /// Polls forever. The next delay is armed only after a cycle has settled.
    pub async fn run(&mut self) {
        info!(
            "Polling every {}s plus up to {}s of jitter",
            self.interval.base().as_secs_f64(),
            self.interval.base().as_secs_f64()
        );

        loop {
            self.run_cycle().await;

            let delay = self.interval.next_delay();
            info!("Next check in {} seconds...", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }
}
