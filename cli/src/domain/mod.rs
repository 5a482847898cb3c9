//! Domain layer. Pure types and rules for probing, aggregation and lifecycle.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod outcome;
pub mod probe;
pub mod process;
pub mod session;

pub use aggregate::{ResultAggregator, Summary, Tier, TierThresholds, success_rate};
pub use config::{HarnessConfig, ProbeConfig, SupervisorConfig};
pub use error::{ConfigError, SupervisorError};
pub use outcome::RunOutcome;
pub use probe::{Cycle, OutcomeKind, ProbeResult, classify_status, status_message};
pub use process::{Lifecycle, LifecycleState};
pub use session::{MonitorSession, RunMode};
