//! `funnelwatch [URL]`: monitor an already-running service.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use funnelwatch_common::DEFAULT_BASE_URL;

use crate::app::AppContext;
use crate::commands::run_session;
use crate::domain::{RunMode, RunOutcome};

/// Arguments for the default monitor command.
#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// Base URL of the service (default: http://localhost:3000)
    pub url: Option<String>,

    /// Seconds between cycles
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Run one cycle and exit
    #[arg(long)]
    pub single: bool,
}

/// Run the monitor loop against the given or default target.
///
/// # Errors
///
/// Returns an error if the URL is not an `http`/`https` URL or rendering fails.
pub fn run(app: &AppContext, args: &MonitorArgs) -> Result<RunOutcome> {
    let target = args.url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    validate_target(target)?;
    run_session(
        app,
        target,
        RunMode::from_single_flag(args.single),
        Duration::from_secs(args.interval),
    )
}

fn validate_target(target: &str) -> Result<()> {
    let rest = target
        .strip_prefix("http://")
        .or_else(|| target.strip_prefix("https://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(()),
        _ => bail!("invalid URL '{target}': expected http://host[:port] or https://host[:port]"),
    }
}
