//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.
//!
//! On a TTY consecutive steps share one spinner; otherwise each step is a line.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` updates the spinner, or prints `"  → {message}"` without a TTY
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ⚠ {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: RefCell::new(None),
        }
    }

    /// Clear any active spinner without a final message.
    pub fn clear(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if !self.ctx.show_progress() {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
            return;
        }
        let mut slot = self.spinner.borrow_mut();
        match slot.as_ref() {
            Some(pb) => pb.set_message(message.to_string()),
            None => *slot = Some(progress::spinner(message)),
        }
    }

    fn success(&self, message: &str) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            progress::finish_ok(&pb, message);
            return;
        }
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            progress::finish_error(&pb, message);
            return;
        }
        self.ctx.warn(message);
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}
