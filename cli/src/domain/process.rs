//! Lifecycle state machine for a supervised service process.

use std::fmt;

use serde::Serialize;

use crate::domain::error::SupervisorError;

/// Lifecycle state of a supervised process.
///
/// `starting → running → stopping → stopped`, or `starting → failed`.
/// A failed process is still torn down, so `failed → stopping` is allowed;
/// so is `starting → stopping` when the owner aborts a start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl LifecycleState {
    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use LifecycleState::{Failed, Running, Starting, Stopped, Stopping};
        matches!(
            (self, next),
            (Starting, Running | Failed | Stopping)
                | (Running | Failed, Stopping)
                | (Stopping, Stopped)
        )
    }

    /// Whether `stop()` has real work to do in this state.
    #[must_use]
    pub fn needs_teardown(self) -> bool {
        matches!(self, Self::Starting | Self::Running | Self::Failed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        })
    }
}

/// Current state plus the guard that keeps transitions monotonic.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: LifecycleState::Starting,
        }
    }
}

impl Lifecycle {
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if `next` would revisit or skip a state.
    pub fn advance(&mut self, next: LifecycleState) -> Result<(), SupervisorError> {
        if !self.state.can_transition_to(next) {
            return Err(SupervisorError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
