//! Per-run monitoring session. Owned by the run that creates it.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::domain::aggregate::{ResultAggregator, Summary, TierThresholds};
use crate::domain::probe::Cycle;

/// Whether the loop stops after one cycle or keeps going until interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    SingleShot,
    Continuous,
}

impl RunMode {
    #[must_use]
    pub fn from_single_flag(single: bool) -> Self {
        if single {
            Self::SingleShot
        } else {
            Self::Continuous
        }
    }
}

/// Target, cadence and running totals for one monitoring run.
#[derive(Debug, Clone)]
pub struct MonitorSession {
    target: String,
    interval: Duration,
    mode: RunMode,
    started_at: DateTime<Local>,
    aggregator: ResultAggregator,
    last_cycle: Option<Summary>,
}

impl MonitorSession {
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        interval: Duration,
        mode: RunMode,
        thresholds: TierThresholds,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            target: target.into().trim_end_matches('/').to_string(),
            interval,
            mode,
            started_at,
            aggregator: ResultAggregator::new(thresholds),
            last_cycle: None,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.aggregator.cycles()
    }

    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.aggregator.errors()
    }

    /// Sequence number the next cycle will carry (1-based).
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.aggregator.cycles() + 1
    }

    /// Fold a completed cycle into the totals.
    pub fn record(&mut self, cycle: &Cycle) -> Summary {
        let summary = self.aggregator.record(cycle);
        self.last_cycle = Some(summary);
        summary
    }

    /// Summary used for the final report and exit classification: the
    /// single cycle in single-shot mode, cumulative totals otherwise.
    #[must_use]
    pub fn final_summary(&self) -> Summary {
        match (self.mode, self.last_cycle) {
            (RunMode::SingleShot, Some(cycle)) => cycle,
            _ => self.aggregator.cumulative(),
        }
    }

    #[must_use]
    pub fn cumulative(&self) -> Summary {
        self.aggregator.cumulative()
    }
}
