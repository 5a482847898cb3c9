//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use anyhow::Result;
use console::Term;
use funnelwatch_common::ProbeSpec;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

use crate::application::ports::CycleObserver;
use crate::application::services::monitor::LoopExit;
use crate::domain::{Cycle, MonitorSession, ProbeResult, Summary};
pub use human::HumanRenderer;
pub use json::JsonRenderer;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }

    /// Print a pre-formatted line. Suppressed when `quiet`.
    pub fn line(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }
}

/// Human or JSON rendering, chosen once from `--json`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Print the session banner. JSON output has none.
    pub fn render_banner(&self, session: &MonitorSession, probe_count: usize) {
        if let Self::Human(h) = self {
            h.render_banner(session, probe_count);
        }
    }

    /// Print final statistics for the session.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_final(&self, session: &MonitorSession, exit: LoopExit) -> Result<()> {
        let now = chrono::Local::now();
        match self {
            Self::Human(h) => {
                h.render_final(session, exit, now);
                Ok(())
            }
            Self::Json(j) => {
                println!("{}", j.session_report(session, exit, now)?);
                Ok(())
            }
        }
    }

    /// Print the configured probe table.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_probe_table(&self, probes: &[ProbeSpec]) -> Result<()> {
        match self {
            Self::Human(h) => h.render_probe_table(probes),
            Self::Json(_) => println!("{}", json::probe_table(probes)?),
        }
        Ok(())
    }

    /// Print a discovered base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_discovered(&self, url: &str, port: u16) -> Result<()> {
        match self {
            Self::Human(h) => h.render_discovered(url),
            Self::Json(_) => println!("{}", json::discovered(url, port)?),
        }
        Ok(())
    }
}

impl CycleObserver for Renderer<'_> {
    fn cycle_started(&self, sequence: u64) {
        match self {
            Self::Human(h) => h.cycle_started(sequence),
            Self::Json(j) => j.cycle_started(sequence),
        }
    }

    fn probe_finished(&self, result: &ProbeResult) {
        match self {
            Self::Human(h) => h.probe_finished(result),
            Self::Json(j) => j.probe_finished(result),
        }
    }

    fn cycle_completed(&self, cycle: &Cycle, cycle_summary: &Summary, cumulative: &Summary) {
        match self {
            Self::Human(h) => h.cycle_completed(cycle, cycle_summary, cumulative),
            Self::Json(j) => j.cycle_completed(cycle, cycle_summary, cumulative),
        }
    }
}
