//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` and bundles the output
//! context, the validated configuration, the session's probe table and the
//! stop token raised on interrupt.

use std::path::PathBuf;

use anyhow::{Context, Result};
use funnelwatch_common::ProbeSpec;

use crate::application::StopToken;
use crate::application::ports::ConfigStore;
use crate::domain::HarnessConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Explicit config file (`--config` / `FUNNELWATCH_CONFIG`).
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    ///
    /// Quiet in JSON mode so progress lines never mix with the JSON document.
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Validated harness configuration.
    pub config: HarnessConfig,
    /// Probe table shared by every entry point.
    pub probes: Vec<ProbeSpec>,
    /// Raised when the operator interrupts the run.
    pub stop: StopToken,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed or validated.
    pub fn new(flags: &AppFlags, stop: StopToken) -> Result<Self> {
        let store = YamlConfigStore::new(flags.config.clone());
        let config = store.load()?;
        Self::with_config(flags, config, stop)
    }

    /// Construct an `AppContext` around an already-loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured probe table is invalid.
    pub fn with_config(flags: &AppFlags, config: HarnessConfig, stop: StopToken) -> Result<Self> {
        let probes = config.probe_table().context("invalid probe table")?;
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Ok(Self {
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            config,
            probes,
            stop,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer::default()),
        }
    }

    /// Report a fatal error in the active output mode.
    pub fn report_error(&self, message: &str, code: &str) {
        if self.is_json() {
            match crate::output::json::format_error(message, code) {
                Ok(obj) => println!("{obj}"),
                Err(_) => self.output.error(message),
            }
        } else {
            self.output.error(message);
        }
    }
}
