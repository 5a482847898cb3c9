//! Shared fakes for unit tests.
//!
//! Each fake implements one application port so tests can drive services
//! without sockets or child processes.

#![allow(clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use anyhow::Result;
use funnelwatch_cli::application::ports::{
    CycleObserver, HttpClient, HttpRequest, LaunchSpec, ManagedProcess, PortProbe,
    ProgressReporter, ServiceLauncher, TransportError,
};
use funnelwatch_cli::domain::{Cycle, ProbeResult, Summary};

// ── HTTP ──────────────────────────────────────────────────────────────────────

/// Answers by URL path; unknown paths get `fallback`.
pub struct PathClient {
    replies: BTreeMap<String, Result<u16, TransportError>>,
    fallback: Result<u16, TransportError>,
    pub sent: RefCell<Vec<String>>,
}

impl PathClient {
    pub fn all(status: u16) -> Self {
        Self {
            replies: BTreeMap::new(),
            fallback: Ok(status),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn refusing() -> Self {
        Self {
            replies: BTreeMap::new(),
            fallback: Err(TransportError::Connect("connection refused".to_string())),
            sent: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with(mut self, path: &str, reply: Result<u16, TransportError>) -> Self {
        self.replies.insert(path.to_string(), reply);
        self
    }
}

impl HttpClient for PathClient {
    fn send(&self, request: &HttpRequest<'_>) -> Result<u16, TransportError> {
        self.sent.borrow_mut().push(request.url.clone());
        let path = request
            .url
            .splitn(4, '/')
            .nth(3)
            .map_or_else(|| "/".to_string(), |rest| format!("/{rest}"));
        self.replies
            .get(&path)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Reports the given ports as taken.
pub struct OccupiedPorts(pub HashSet<u16>);

impl OccupiedPorts {
    pub fn of(ports: &[u16]) -> Self {
        Self(ports.iter().copied().collect())
    }
}

impl PortProbe for OccupiedPorts {
    fn is_listening(&self, port: u16) -> bool {
        self.0.contains(&port)
    }
}

// ── Processes ─────────────────────────────────────────────────────────────────

/// Observable state shared between a fake process and its test.
#[derive(Default)]
pub struct ProcessLog {
    pub exited: Cell<bool>,
    pub terminations: Cell<u32>,
    pub kills: Cell<u32>,
    pub waits: Cell<u32>,
}

/// Exits as soon as it is terminated.
pub struct FakeProcess {
    log: Rc<ProcessLog>,
}

impl ManagedProcess for FakeProcess {
    fn pid(&self) -> u32 {
        4242
    }

    fn try_exit(&mut self) -> Result<Option<String>> {
        Ok(self.log.exited.get().then(|| "exit status: 0".to_string()))
    }

    fn terminate(&mut self) -> Result<()> {
        self.log.terminations.set(self.log.terminations.get() + 1);
        self.log.exited.set(true);
        Ok(())
    }

    fn kill(&mut self) -> Result<()> {
        self.log.kills.set(self.log.kills.get() + 1);
        self.log.exited.set(true);
        Ok(())
    }

    fn wait(&mut self) -> Result<String> {
        self.log.waits.set(self.log.waits.get() + 1);
        Ok("exit status: 0".to_string())
    }
}

/// Hands out `FakeProcess`es and records every launch.
#[derive(Default)]
pub struct FakeLauncher {
    pub log: Rc<ProcessLog>,
    pub launches: RefCell<Vec<(String, u16)>>,
}

impl ServiceLauncher for FakeLauncher {
    type Process = FakeProcess;

    fn launch(&self, spec: &LaunchSpec, port: u16) -> Result<FakeProcess> {
        self.launches.borrow_mut().push((spec.display(), port));
        Ok(FakeProcess {
            log: Rc::clone(&self.log),
        })
    }
}

// ── Reporting ─────────────────────────────────────────────────────────────────

/// Collects progress messages.
#[derive(Default)]
pub struct RecordingReporter {
    pub steps: RefCell<Vec<String>>,
    pub successes: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }
    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }
    fn warn(&self, _message: &str) {}
}

/// Collects published cycle summaries.
#[derive(Default)]
pub struct RecordingObserver {
    pub results: RefCell<Vec<ProbeResult>>,
    pub summaries: RefCell<Vec<(Summary, Summary)>>,
}

impl CycleObserver for RecordingObserver {
    fn cycle_started(&self, _sequence: u64) {}

    fn probe_finished(&self, result: &ProbeResult) {
        self.results.borrow_mut().push(result.clone());
    }

    fn cycle_completed(&self, _cycle: &Cycle, cycle_summary: &Summary, cumulative: &Summary) {
        self.summaries
            .borrow_mut()
            .push((*cycle_summary, *cumulative));
    }
}
