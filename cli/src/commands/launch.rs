//! `funnelwatch launch`: run the real service under supervision.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::LaunchSpec;
use crate::commands::{WatchArgs, supervise};
use crate::domain::RunOutcome;

/// Arguments for the launch command.
#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
    /// Service command line, split on whitespace (default: npm run dev)
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Seconds the service gets to boot before health checks start
    #[arg(long, default_value_t = 20, value_name = "SECS")]
    pub startup_grace: u64,

    /// Show the service's own stdout/stderr
    #[arg(long)]
    pub show_output: bool,

    #[command(flatten)]
    pub watch: WatchArgs,
}

/// Platform default for starting the web service in development mode.
#[must_use]
pub fn default_command() -> Vec<String> {
    let npm = if cfg!(windows) { "npm.cmd" } else { "npm" };
    vec![npm.to_string(), "run".to_string(), "dev".to_string()]
}

/// Build the launch spec from `args`.
#[must_use]
pub fn launch_spec(args: &LaunchArgs) -> LaunchSpec {
    let mut words = args
        .command
        .as_deref()
        .map(|cmd| cmd.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|words| !words.is_empty())
        .unwrap_or_else(default_command)
        .into_iter();
    LaunchSpec {
        program: words.next().unwrap_or_default(),
        args: words.collect(),
        startup_grace: Duration::from_secs(args.startup_grace),
    }
}

/// Launch, gate, check and tear down the real service.
///
/// # Errors
///
/// Returns an error if reporting or teardown fails unexpectedly.
pub fn run(app: &AppContext, args: &LaunchArgs) -> Result<RunOutcome> {
    supervise(app, &launch_spec(args), &args.watch, args.show_output)
}
