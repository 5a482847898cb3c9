//! Human-readable terminal renderer.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local};
use funnelwatch_common::ProbeSpec;
use owo_colors::OwoColorize as _;

use crate::application::ports::CycleObserver;
use crate::application::services::monitor::LoopExit;
use crate::domain::{Cycle, MonitorSession, OutcomeKind, ProbeResult, RunMode, Summary};
use crate::output::{OutputContext, Styles};

/// Width of the probe label column.
const LABEL_WIDTH: usize = 32;

/// Renders monitor events and reports as terminal lines via `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    pub fn render_banner(&self, session: &MonitorSession, probe_count: usize) {
        self.ctx.header(&format!("Monitoring {}", session.target()));
        let cadence = match session.mode() {
            RunMode::SingleShot => "single cycle".to_string(),
            RunMode::Continuous => format!("every {}s", session.interval().as_secs()),
        };
        self.ctx.kv("Probes:", &probe_count.to_string());
        self.ctx.kv("Mode:  ", &cadence);
        self.ctx.line("");
    }

    /// Print final statistics. In quiet mode a single summary line is printed.
    pub fn render_final(&self, session: &MonitorSession, exit: LoopExit, now: DateTime<Local>) {
        let summary = session.final_summary();
        let rate = format!("{:.1}% ({})", summary.success_rate, summary.tier);
        if self.ctx.quiet {
            println!(
                "{rate} {}/{} passed in {} cycle(s)",
                summary.passed,
                summary.total,
                session.cycle_count()
            );
            return;
        }

        let elapsed = now
            .signed_duration_since(session.started_at())
            .to_std()
            .unwrap_or_default();

        self.ctx.line("");
        self.ctx.header("Final statistics");
        self.ctx.kv("Target:      ", session.target());
        self.ctx.kv("Cycles:      ", &session.cycle_count().to_string());
        self.ctx.kv("Probes:      ", &summary.total.to_string());
        self.ctx.kv("Errors:      ", &summary.failed.to_string());
        self.ctx.kv(
            "Success rate:",
            &rate.style(self.ctx.styles.tier(summary.tier)).to_string(),
        );
        self.ctx.kv("Duration:    ", &format_duration(elapsed));
        if exit == LoopExit::Interrupted {
            self.ctx.warn("Run interrupted");
        }
    }

    pub fn render_probe_table(&self, probes: &[ProbeSpec]) {
        for probe in probes {
            let payload = if probe.payload.is_some() { "json" } else { "-" };
            println!(
                "  {:<LABEL_WIDTH$} {:<6} expects {}",
                probe.label(),
                payload,
                probe.expected
            );
        }
    }

    pub fn render_discovered(&self, url: &str) {
        println!("{url}");
    }
}

impl CycleObserver for HumanRenderer<'_> {
    fn cycle_started(&self, sequence: u64) {
        let title = format!(
            "Cycle #{sequence} · {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        self.ctx.header(&title);
    }

    fn probe_finished(&self, result: &ProbeResult) {
        self.ctx.line(&probe_line(&self.ctx.styles, result));
    }

    fn cycle_completed(&self, cycle: &Cycle, cycle_summary: &Summary, cumulative: &Summary) {
        self.ctx
            .line(&cycle_footer(&self.ctx.styles, cycle, cycle_summary, cumulative));
        self.ctx.line("");
    }
}

// ── Line formatting ───────────────────────────────────────────────────────────

/// One pass/fail line for a probe result.
#[must_use]
pub fn probe_line(styles: &Styles, result: &ProbeResult) -> String {
    let mark = if result.passed() {
        "✓".style(styles.success).to_string()
    } else {
        "✗".style(styles.error).to_string()
    };
    let detail = match result.kind {
        OutcomeKind::Success | OutcomeKind::UnexpectedStatus => result.message.clone(),
        kind => format!("{kind}: {}", result.message),
    };
    format!(
        "  {mark} {:<LABEL_WIDTH$} {detail} {}",
        result.probe,
        format!("({}ms)", result.elapsed.as_millis()).style(styles.dim)
    )
}

/// Summary line printed after every cycle.
#[must_use]
pub fn cycle_footer(
    styles: &Styles,
    cycle: &Cycle,
    cycle_summary: &Summary,
    cumulative: &Summary,
) -> String {
    let mut line = format!(
        "  Cycle #{}: {}/{} passed, {} error(s), {:.1}% in {}ms",
        cycle.sequence(),
        cycle_summary.passed,
        cycle_summary.total,
        cycle.error_count(),
        cycle_summary.success_rate,
        cycle.elapsed().as_millis()
    );
    if cycle.sequence() > 1 {
        let _ = write!(line, " | overall {:.1}%", cumulative.success_rate);
    }
    let tier = if cycle.sequence() > 1 {
        cumulative.tier
    } else {
        cycle_summary.tier
    };
    format!("{line} {}", format!("[{tier}]").style(styles.tier(tier)))
}

/// `1h 02m 03s`, `2m 05s` or `7s`.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}
