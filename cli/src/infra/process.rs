//! Service process spawning and termination.
//!
//! Termination goes through a `ProcessControl` capability. On Unix the
//! service runs in its own process group and the whole group is signalled,
//! so wrappers such as `npm run dev` take their children down with them.
//! Elsewhere the direct child is terminated and then killed.

use std::io;
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};
use funnelwatch_common::PORT_ENV;

use crate::application::ports::{LaunchSpec, ManagedProcess, ServiceLauncher};

// ── Process control capability ────────────────────────────────────────────────

/// How a spawned service is set up and brought down.
pub trait ProcessControl {
    /// Adjust the command before it is spawned.
    fn prepare(&self, command: &mut Command);
    /// Request a graceful exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered.
    fn terminate(&self, child: &mut Child) -> io::Result<()>;
    /// Force an exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be killed.
    fn kill(&self, child: &mut Child) -> io::Result<()>;
}

/// Signals the service's whole process group (`SIGTERM`, then `SIGKILL`).
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupSignal;

#[cfg(unix)]
impl ProcessControl for GroupSignal {
    fn prepare(&self, command: &mut Command) {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    fn terminate(&self, child: &mut Child) -> io::Result<()> {
        signal_group(child, nix::sys::signal::Signal::SIGTERM)
    }

    fn kill(&self, child: &mut Child) -> io::Result<()> {
        signal_group(child, nix::sys::signal::Signal::SIGKILL)
    }
}

#[cfg(unix)]
fn signal_group(child: &Child, signal: nix::sys::signal::Signal) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::unistd::Pid;

    let pgid = i32::try_from(child.id())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    match nix::sys::signal::killpg(Pid::from_raw(pgid), signal) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

/// Terminates the direct child only, then kills it.
///
/// On Unix "terminate" is `SIGTERM`; elsewhere there is no graceful request,
/// so it is the same as a kill.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminateThenKill;

impl ProcessControl for TerminateThenKill {
    fn prepare(&self, _command: &mut Command) {}

    #[cfg(unix)]
    fn terminate(&self, child: &mut Child) -> io::Result<()> {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        let pid = i32::try_from(child.id())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        match kill(Pid::from_raw(pid), Signal::SIGTERM) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }

    #[cfg(not(unix))]
    fn terminate(&self, child: &mut Child) -> io::Result<()> {
        self.kill(child)
    }

    fn kill(&self, child: &mut Child) -> io::Result<()> {
        match child.kill() {
            // already exited and reaped
            Err(err) if err.kind() == io::ErrorKind::InvalidInput => Ok(()),
            other => other,
        }
    }
}

/// Process control used by default on this platform.
#[cfg(unix)]
pub type PlatformControl = GroupSignal;
#[cfg(not(unix))]
pub type PlatformControl = TerminateThenKill;

// ── Spawned process ───────────────────────────────────────────────────────────

/// A running child plus the control used to stop it.
pub struct SpawnedProcess<C> {
    child: Child,
    control: C,
}

impl<C: ProcessControl> ManagedProcess for SpawnedProcess<C> {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn try_exit(&mut self) -> Result<Option<String>> {
        let status = self.child.try_wait().context("cannot query process status")?;
        Ok(status.map(|s| s.to_string()))
    }

    fn terminate(&mut self) -> Result<()> {
        self.control
            .terminate(&mut self.child)
            .with_context(|| format!("cannot terminate pid {}", self.child.id()))
    }

    fn kill(&mut self) -> Result<()> {
        self.control
            .kill(&mut self.child)
            .with_context(|| format!("cannot kill pid {}", self.child.id()))
    }

    fn wait(&mut self) -> Result<String> {
        let status = self.child.wait().context("cannot wait for process")?;
        Ok(status.to_string())
    }
}

// ── Launcher ──────────────────────────────────────────────────────────────────

/// Spawns services with the port variable injected into their environment.
#[derive(Debug, Clone, Default)]
pub struct CommandLauncher<C> {
    control: C,
    /// Pass the service's stdout/stderr through instead of discarding it.
    pub inherit_output: bool,
}

impl<C> CommandLauncher<C> {
    #[must_use]
    pub fn new(control: C, inherit_output: bool) -> Self {
        Self {
            control,
            inherit_output,
        }
    }
}

impl<C: ProcessControl + Clone> ServiceLauncher for CommandLauncher<C> {
    type Process = SpawnedProcess<C>;

    fn launch(&self, spec: &LaunchSpec, port: u16) -> Result<Self::Process> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .env(PORT_ENV, port.to_string())
            .stdin(Stdio::null());
        if !self.inherit_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        self.control.prepare(&mut command);

        let child = command
            .spawn()
            .with_context(|| format!("cannot spawn {}", spec.program))?;
        Ok(SpawnedProcess {
            child,
            control: self.control.clone(),
        })
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
