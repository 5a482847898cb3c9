//! How a run ended, and the process exit code for it.

use crate::domain::aggregate::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every probe passed and the tier is not critical.
    Healthy,
    /// At least one probe failed, or the success rate is critical.
    Degraded,
    /// The supervised service never became ready.
    StartFailed,
    /// The operator interrupted the run.
    Interrupted,
    /// An unexpected internal error ended the run.
    InternalError,
}

impl RunOutcome {
    #[must_use]
    pub fn from_summary(summary: &Summary) -> Self {
        if summary.is_healthy() {
            Self::Healthy
        } else {
            Self::Degraded
        }
    }

    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Degraded | Self::StartFailed => 1,
            Self::Interrupted => 2,
            Self::InternalError => 3,
        }
    }
}
