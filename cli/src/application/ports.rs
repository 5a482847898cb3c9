//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared probe types,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::time::Duration;

use anyhow::Result;
use funnelwatch_common::HttpMethod;
use thiserror::Error;

use crate::domain::{Cycle, HarnessConfig, ProbeResult, Summary};

// ── HTTP Port ─────────────────────────────────────────────────────────────────

/// One outgoing HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest<'a> {
    pub method: HttpMethod,
    pub url: String,
    /// Serialized as JSON with `Content-Type: application/json`.
    pub json: Option<&'a serde_json::Value>,
    pub timeout: Duration,
}

/// Why no usable status code came back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Sends a single request and reports the status code, whatever it is.
///
/// Non-2xx statuses are `Ok`; only transport-level failures are `Err`.
pub trait HttpClient {
    /// # Errors
    ///
    /// Returns a `TransportError` when no response status was received.
    fn send(&self, request: &HttpRequest<'_>) -> std::result::Result<u16, TransportError>;
}

// ── Network Port ──────────────────────────────────────────────────────────────

/// Checks whether something accepts TCP connections on a local port.
pub trait PortProbe {
    fn is_listening(&self, port: u16) -> bool;
}

// ── Process Ports ─────────────────────────────────────────────────────────────

/// What to run when launching a supervised service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Time the service gets to boot before the health gate starts.
    pub startup_grace: Duration,
}

impl LaunchSpec {
    /// Display form, e.g. `npm run dev`.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A spawned child process the supervisor owns.
#[cfg_attr(test, mockall::automock)]
pub trait ManagedProcess {
    fn pid(&self) -> u32;
    /// Non-blocking check: `Some(description)` once the process has exited.
    ///
    /// # Errors
    ///
    /// Returns an error if the process status cannot be queried.
    fn try_exit(&mut self) -> Result<Option<String>>;
    /// Ask the process (and its children, where supported) to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal cannot be delivered.
    fn terminate(&mut self) -> Result<()>;
    /// Force the process to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be killed.
    fn kill(&mut self) -> Result<()>;
    /// Block until the process has exited and reap it.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting fails.
    fn wait(&mut self) -> Result<String>;
}

/// Spawns service processes bound to a port.
pub trait ServiceLauncher {
    type Process: ManagedProcess;

    /// Spawn `spec` with the port environment variable set to `port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn launch(&self, spec: &LaunchSpec, port: u16) -> Result<Self::Process>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Loads harness configuration. A missing source yields defaults.
pub trait ConfigStore {
    /// # Errors
    ///
    /// Returns an error if the source exists but cannot be read or parsed.
    fn load(&self) -> Result<HarnessConfig>;
}

// ── Progress Reporting Ports ──────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Receives monitor-loop events as they happen.
pub trait CycleObserver {
    fn cycle_started(&self, sequence: u64);
    fn probe_finished(&self, result: &ProbeResult);
    /// Called once per published cycle, after totals are updated.
    fn cycle_completed(&self, cycle: &Cycle, cycle_summary: &Summary, cumulative: &Summary);
}
