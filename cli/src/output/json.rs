//! JSON output helpers.
//!
//! `--json` suppresses per-probe lines and prints one object at the end of
//! the run. Errors use the same `{error, message, code}` object everywhere.

use std::cell::RefCell;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use funnelwatch_common::ProbeSpec;
use serde::Serialize;

use crate::application::ports::CycleObserver;
use crate::application::services::monitor::LoopExit;
use crate::domain::{Cycle, MonitorSession, ProbeResult, RunMode, Summary};

/// Keeps the last published cycle for the final report.
#[derive(Default)]
pub struct JsonRenderer {
    last_cycle: RefCell<Option<Cycle>>,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    target: &'a str,
    mode: &'static str,
    interrupted: bool,
    started_at: String,
    duration_ms: i64,
    cycles: u64,
    errors: u64,
    summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_cycle: Option<&'a Cycle>,
}

impl JsonRenderer {
    /// Final report for `session`, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn session_report(
        &self,
        session: &MonitorSession,
        exit: LoopExit,
        now: DateTime<Local>,
    ) -> Result<String> {
        let last = self.last_cycle.borrow();
        let report = SessionReport {
            target: session.target(),
            mode: match session.mode() {
                RunMode::SingleShot => "single-shot",
                RunMode::Continuous => "continuous",
            },
            interrupted: exit == LoopExit::Interrupted,
            started_at: session.started_at().to_rfc3339(),
            duration_ms: now
                .signed_duration_since(session.started_at())
                .num_milliseconds(),
            cycles: session.cycle_count(),
            errors: session.error_count(),
            summary: session.final_summary(),
            last_cycle: last.as_ref(),
        };
        serde_json::to_string_pretty(&report).context("JSON serialization failed")
    }
}

impl CycleObserver for JsonRenderer {
    fn cycle_started(&self, _sequence: u64) {}

    fn probe_finished(&self, _result: &ProbeResult) {}

    fn cycle_completed(&self, cycle: &Cycle, _cycle_summary: &Summary, _cumulative: &Summary) {
        *self.last_cycle.borrow_mut() = Some(cycle.clone());
    }
}

/// The probe table as a JSON array.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn probe_table(probes: &[ProbeSpec]) -> Result<String> {
    serde_json::to_string_pretty(probes).context("JSON serialization failed")
}

/// A discovered target as `{url, port}`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn discovered(url: &str, port: u16) -> Result<String> {
    let obj = serde_json::json!({ "url": url, "port": port });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
