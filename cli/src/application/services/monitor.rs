//! Application service: the cycle-based monitor loop.
//!
//! Probes run one at a time in table order. A cycle is published to the
//! session and the observer only once every probe has a result; a cycle cut
//! short by an interrupt is dropped without touching the totals.

use std::time::{Duration, Instant};

use chrono::Local;
use funnelwatch_common::ProbeSpec;

use crate::application::ports::{CycleObserver, HttpClient};
use crate::application::services::endpoint_probe::probe_endpoint;
use crate::application::stop::StopToken;
use crate::domain::{Cycle, MonitorSession, RunMode};

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Single-shot run finished its cycle.
    Completed,
    /// The stop token was raised.
    Interrupted,
}

/// Probe set, transport and timeout for a monitoring run.
pub struct MonitorLoop<'a, H> {
    pub client: &'a H,
    pub probes: &'a [ProbeSpec],
    pub timeout: Duration,
}

impl<H: HttpClient> MonitorLoop<'_, H> {
    /// Run one full cycle against `target`.
    ///
    /// Returns `None` if `stop` was raised before every probe finished.
    pub fn run_cycle(
        &self,
        target: &str,
        sequence: u64,
        stop: &StopToken,
        observer: &impl CycleObserver,
    ) -> Option<Cycle> {
        let started_at = Local::now();
        let clock = Instant::now();
        observer.cycle_started(sequence);

        let mut results = Vec::with_capacity(self.probes.len());
        for spec in self.probes {
            if stop.is_stopped() {
                tracing::info!(sequence, completed = results.len(), "cycle abandoned");
                return None;
            }
            let result = probe_endpoint(self.client, target, spec, self.timeout);
            observer.probe_finished(&result);
            results.push(result);
        }
        Some(Cycle::new(sequence, started_at, clock.elapsed(), results))
    }

    /// Drive `session` until single-shot completes or `stop` is raised.
    ///
    /// The interval is slept between the end of one cycle and the start of
    /// the next, and is ignored in single-shot mode.
    pub fn run(
        &self,
        session: &mut MonitorSession,
        stop: &StopToken,
        observer: &impl CycleObserver,
    ) -> LoopExit {
        loop {
            if stop.is_stopped() {
                return LoopExit::Interrupted;
            }
            let sequence = session.next_sequence();
            let Some(cycle) = self.run_cycle(session.target(), sequence, stop, observer) else {
                return LoopExit::Interrupted;
            };
            let summary = session.record(&cycle);
            observer.cycle_completed(&cycle, &summary, &session.cumulative());
            tracing::debug!(
                sequence = cycle.sequence(),
                errors = cycle.error_count(),
                rate = summary.success_rate,
                "cycle published"
            );

            if session.mode() == RunMode::SingleShot {
                return LoopExit::Completed;
            }
            if stop.sleep(session.interval()) {
                return LoopExit::Interrupted;
            }
        }
    }
}
