//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::application::StopToken;
use crate::commands;
use crate::domain::RunOutcome;

/// Probe a web service's key endpoints and report its health
#[derive(Parser)]
#[command(
    name = "funnelwatch",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Output the final summary as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Config file (default: ~/.funnelwatch/config.yaml)
    #[arg(long, global = true, env = "FUNNELWATCH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub monitor: commands::monitor::MonitorArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the real service on a free port, check it, then stop it
    Launch(commands::launch::LaunchArgs),

    /// Start the stand-in service on a free port, check it, then stop it
    Mock(commands::mock::MockArgs),

    /// Print the first candidate port serving `GET /`
    Discover,

    /// List the configured probe table
    Probes,
}

impl Cli {
    /// Execute the CLI command on the current (blocking) thread.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or an unexpected
    /// internal failure ends the run.
    pub fn run(self, stop: StopToken) -> Result<RunOutcome> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            monitor,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        };
        let app = AppContext::new(&flags, stop)?;
        match command {
            None => commands::monitor::run(&app, &monitor),
            Some(Command::Launch(args)) => commands::launch::run(&app, &args),
            Some(Command::Mock(args)) => commands::mock::run(&app, &args),
            Some(Command::Discover) => commands::discover::run(&app),
            Some(Command::Probes) => commands::probes::run(&app),
        }
    }
}
