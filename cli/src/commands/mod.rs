//! Command implementations
//!
//! Every handler is synchronous: `main` runs it on a blocking thread and the
//! interrupt handler reaches it through `AppContext::stop`.

pub mod discover;
pub mod launch;
pub mod mock;
pub mod monitor;
pub mod probes;

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Args;
use funnelwatch_common::CANDIDATE_PORTS;

use crate::app::AppContext;
use crate::application::ports::{LaunchSpec, ProgressReporter};
use crate::application::services::monitor::{LoopExit, MonitorLoop};
use crate::application::services::supervisor::{GateSettings, ProcessSupervisor};
use crate::domain::{MonitorSession, RunMode, RunOutcome, SupervisorError};
use crate::infra::http::UreqClient;
use crate::infra::net::TcpPortProbe;
use crate::infra::process::{CommandLauncher, PlatformControl};
use crate::output::reporter::TerminalReporter;

/// Cadence flags for commands that own a service (`launch`, `mock`).
///
/// These run a single cycle unless `--watch` is given.
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Keep monitoring until interrupted instead of running one cycle
    #[arg(long)]
    pub watch: bool,

    /// Seconds between cycles when watching
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

impl WatchArgs {
    #[must_use]
    pub fn mode(&self) -> RunMode {
        RunMode::from_single_flag(!self.watch)
    }
}

/// Run a monitoring session against `target` and report it.
///
/// # Errors
///
/// Returns an error if the final report cannot be rendered.
pub fn run_session(
    app: &AppContext,
    target: &str,
    mode: RunMode,
    interval: Duration,
) -> Result<RunOutcome> {
    let client = UreqClient::default();
    let renderer = app.renderer();
    let mut session = MonitorSession::new(
        target,
        interval,
        mode,
        app.config.thresholds,
        Local::now(),
    );
    tracing::info!(target = session.target(), ?mode, "session started");
    renderer.render_banner(&session, app.probes.len());

    let monitor = MonitorLoop {
        client: &client,
        probes: &app.probes,
        timeout: app.config.probe.timeout(),
    };
    let exit = monitor.run(&mut session, &app.stop, &renderer);
    renderer.render_final(&session, exit)?;

    Ok(match exit {
        LoopExit::Interrupted => RunOutcome::Interrupted,
        LoopExit::Completed => RunOutcome::from_summary(&session.final_summary()),
    })
}

/// Start `spec` under supervision, monitor it, then tear it down.
///
/// # Errors
///
/// Returns an error if the session report fails or teardown hits an
/// inconsistent lifecycle.
pub fn supervise(
    app: &AppContext,
    spec: &LaunchSpec,
    watch: &WatchArgs,
    inherit_output: bool,
) -> Result<RunOutcome> {
    let launcher = CommandLauncher::new(PlatformControl::default(), inherit_output);
    let client = UreqClient::default();
    let ports = TcpPortProbe::default();
    let supervisor = ProcessSupervisor {
        launcher: &launcher,
        ports: &ports,
        client: &client,
        candidates: &CANDIDATE_PORTS,
        settings: GateSettings::from_config(&app.config.supervisor, &app.config.probe),
    };

    let reporter = TerminalReporter::new(&app.output);
    let mut handle = match supervisor.start(spec, &app.stop, &reporter) {
        Ok(handle) => handle,
        Err(SupervisorError::Interrupted) => {
            reporter.warn("Interrupted before the service was ready");
            return Ok(RunOutcome::Interrupted);
        }
        Err(err) => {
            reporter.clear();
            app.report_error(&err.to_string(), "start-failed");
            return Ok(RunOutcome::StartFailed);
        }
    };
    drop(reporter);

    let outcome = run_session(
        app,
        &handle.base_url(),
        watch.mode(),
        Duration::from_secs(watch.interval),
    );
    handle.stop()?;
    app.output.success(&format!("Service on port {} stopped", handle.port()));
    outcome
}
