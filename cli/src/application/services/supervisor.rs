//! Application service: supervised service lifecycle.
//!
//! Spawns a service on a free port, holds it behind a health gate until it
//! answers `GET /`, and guarantees teardown on every exit path through the
//! `ProcessHandle` drop guard.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use funnelwatch_common::{ExpectedStatus, ProbeSpec, base_url_for_port};

use crate::application::ports::{
    HttpClient, LaunchSpec, ManagedProcess, PortProbe, ProgressReporter, ServiceLauncher,
};
use crate::application::services::endpoint_probe::probe_endpoint;
use crate::application::services::port_locator::find_free;
use crate::application::stop::StopToken;
use crate::domain::{Lifecycle, LifecycleState, ProbeConfig, SupervisorConfig, SupervisorError};

/// How often liveness is re-checked while waiting.
const POLL_SLICE: Duration = Duration::from_millis(250);
/// How often exit is re-checked during the stop grace window.
const STOP_POLL: Duration = Duration::from_millis(50);

/// Health gate and teardown timings.
#[derive(Debug, Clone, Copy)]
pub struct GateSettings {
    pub retries: u32,
    pub backoff: Duration,
    pub stop_grace: Duration,
    pub probe_timeout: Duration,
}

impl GateSettings {
    #[must_use]
    pub fn from_config(supervisor: &SupervisorConfig, probe: &ProbeConfig) -> Self {
        Self {
            retries: supervisor.health_retries,
            backoff: supervisor.health_backoff(),
            stop_grace: supervisor.stop_grace(),
            probe_timeout: probe.timeout(),
        }
    }
}

// ── Process handle ────────────────────────────────────────────────────────────

/// Owned handle to a supervised process.
///
/// Dropping a handle that has not been stopped tears the process down.
pub struct ProcessHandle<P: ManagedProcess> {
    process: P,
    pid: u32,
    port: u16,
    lifecycle: Lifecycle,
    stop_grace: Duration,
}

impl<P: ManagedProcess> ProcessHandle<P> {
    fn new(process: P, port: u16, stop_grace: Duration) -> Self {
        let pid = process.pid();
        Self {
            process,
            pid,
            port,
            lifecycle: Lifecycle::default(),
            stop_grace,
        }
    }

    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        base_url_for_port(self.port)
    }

    /// Terminate gracefully, wait the grace window, then force-kill.
    ///
    /// Calling this on a stopped handle is a no-op success.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` only if the lifecycle is inconsistent.
    pub fn stop(&mut self) -> Result<(), SupervisorError> {
        if !self.state().needs_teardown() {
            return Ok(());
        }
        self.lifecycle.advance(LifecycleState::Stopping)?;
        tracing::info!(pid = self.pid, port = self.port, "stopping service");

        if self.exited().is_none() {
            if let Err(err) = self.process.terminate() {
                tracing::warn!(pid = self.pid, "graceful termination failed: {err:#}");
            }
            if !self.wait_exit(self.stop_grace) {
                tracing::warn!(
                    pid = self.pid,
                    grace_ms = self.stop_grace.as_millis(),
                    "service ignored termination, killing"
                );
                if let Err(err) = self.process.kill() {
                    tracing::warn!(pid = self.pid, "kill failed: {err:#}");
                }
            }
        }

        match self.process.wait() {
            Ok(status) => tracing::info!(pid = self.pid, %status, "service stopped"),
            Err(err) => tracing::warn!(pid = self.pid, "failed to reap service: {err:#}"),
        }
        self.lifecycle.advance(LifecycleState::Stopped)
    }

    fn exited(&mut self) -> Option<String> {
        match self.process.try_exit() {
            Ok(status) => status,
            Err(err) => {
                tracing::debug!(pid = self.pid, "exit check failed: {err:#}");
                None
            }
        }
    }

    fn wait_exit(&mut self, grace: Duration) -> bool {
        let deadline = Instant::now().checked_add(grace);
        loop {
            if self.exited().is_some() {
                return true;
            }
            match remaining(deadline) {
                Some(left) if left.is_zero() => return false,
                left => thread::sleep(left.map_or(STOP_POLL, |left| STOP_POLL.min(left))),
            }
        }
    }

    /// Wait `duration` while the process stays alive and no stop is requested.
    fn hold(&mut self, duration: Duration, stop: &StopToken) -> Result<(), SupervisorError> {
        let deadline = Instant::now().checked_add(duration);
        loop {
            if let Some(status) = self.exited() {
                return Err(SupervisorError::ExitedEarly {
                    port: self.port,
                    status,
                });
            }
            let slice = match remaining(deadline) {
                Some(left) if left.is_zero() => return Ok(()),
                left => left.map_or(POLL_SLICE, |left| POLL_SLICE.min(left)),
            };
            if stop.sleep(slice) {
                return Err(SupervisorError::Interrupted);
            }
        }
    }
}

impl<P: ManagedProcess> fmt::Debug for ProcessHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("port", &self.port)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Time left until `deadline`; `None` when there is no deadline.
fn remaining(deadline: Option<Instant>) -> Option<Duration> {
    deadline.map(|d| d.saturating_duration_since(Instant::now()))
}

impl<P: ManagedProcess> Drop for ProcessHandle<P> {
    fn drop(&mut self) {
        if self.state().needs_teardown() {
            if let Err(err) = self.stop() {
                tracing::warn!(pid = self.pid, "teardown on drop failed: {err}");
            }
        }
    }
}

/// `GET /` accepting any 2xx status.
fn health_check() -> ProbeSpec {
    let success: Vec<u16> = (200..300).collect();
    ProbeSpec::get("/", ExpectedStatus::any_of(&success))
}

// ── Supervisor ────────────────────────────────────────────────────────────────

/// Starts services and gates them on health.
pub struct ProcessSupervisor<'a, L, N, H> {
    pub launcher: &'a L,
    pub ports: &'a N,
    pub client: &'a H,
    pub candidates: &'a [u16],
    pub settings: GateSettings,
}

impl<L, N, H> ProcessSupervisor<'_, L, N, H>
where
    L: ServiceLauncher,
    N: PortProbe,
    H: HttpClient,
{
    /// Pick a free port, spawn, wait out the startup grace, then health-gate.
    ///
    /// On any failure the process is torn down before returning.
    ///
    /// # Errors
    ///
    /// Returns a `SupervisorError` if spawning fails, the process exits early,
    /// the health gate is exhausted, or `stop` is raised first.
    pub fn start(
        &self,
        spec: &LaunchSpec,
        stop: &StopToken,
        reporter: &impl ProgressReporter,
    ) -> Result<ProcessHandle<L::Process>, SupervisorError> {
        if spec.program.trim().is_empty() {
            return Err(SupervisorError::EmptyCommand);
        }
        let port = find_free(self.ports, self.candidates);
        let command = spec.display();
        reporter.step(&format!("starting '{command}' on port {port}..."));

        let process = self
            .launcher
            .launch(spec, port)
            .map_err(|err| SupervisorError::Spawn {
                command: command.clone(),
                reason: format!("{err:#}"),
            })?;
        let mut handle = ProcessHandle::new(process, port, self.settings.stop_grace);
        tracing::info!(pid = handle.pid(), port, %command, "service spawned");

        match self.gate(&mut handle, spec, stop, reporter) {
            Ok(()) => {
                handle.lifecycle.advance(LifecycleState::Running)?;
                reporter.success(&format!("service ready at {}", handle.base_url()));
                Ok(handle)
            }
            Err(err) => {
                if !matches!(err, SupervisorError::Interrupted) {
                    handle.lifecycle.advance(LifecycleState::Failed)?;
                }
                tracing::warn!(port, "service start failed: {err}");
                handle.stop()?;
                Err(err)
            }
        }
    }

    fn gate(
        &self,
        handle: &mut ProcessHandle<L::Process>,
        spec: &LaunchSpec,
        stop: &StopToken,
        reporter: &impl ProgressReporter,
    ) -> Result<(), SupervisorError> {
        reporter.step(&format!(
            "waiting {}s for the service to boot...",
            spec.startup_grace.as_secs()
        ));
        handle.hold(spec.startup_grace, stop)?;

        let check = health_check();
        let base_url = handle.base_url();
        let retries = self.settings.retries.max(1);
        let mut last = String::from("no attempt made");
        for attempt in 1..=retries {
            if stop.is_stopped() {
                return Err(SupervisorError::Interrupted);
            }
            reporter.step(&format!("health check {attempt}/{retries}..."));
            let result = probe_endpoint(self.client, &base_url, &check, self.settings.probe_timeout);
            if result.passed() {
                return Ok(());
            }
            last = match result.status {
                Some(code) => format!("HTTP {code}"),
                None => format!("{}: {}", result.kind, result.message),
            };
            tracing::debug!(attempt, retries, %last, "health check failed");
            if attempt < retries {
                handle.hold(self.settings.backoff, stop)?;
            } else if let Some(status) = handle.exited() {
                return Err(SupervisorError::ExitedEarly {
                    port: handle.port(),
                    status,
                });
            }
        }
        Err(SupervisorError::HealthGateExhausted {
            port: handle.port(),
            attempts: retries,
            last,
        })
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
