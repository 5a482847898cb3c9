//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use funnelwatch_common::ProbeSpecError;
use thiserror::Error;

use crate::domain::process::LifecycleState;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while validating harness configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be between 0 and 100, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    #[error("thresholds.acceptable ({acceptable}) must not exceed thresholds.excellent ({excellent})")]
    ThresholdOrder { acceptable: f64, excellent: f64 },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("probe table is empty")]
    EmptyProbeTable,

    #[error("expectation override for '{0}' matches no configured probe")]
    UnknownExpectationPath(String),

    #[error(transparent)]
    InvalidProbe(#[from] ProbeSpecError),
}

// ── Supervisor errors ─────────────────────────────────────────────────────────

/// Errors that end a supervised run.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("no service command given")]
    EmptyCommand,

    #[error("failed to start '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error(
        "service on port {port} did not pass its health gate after {attempts} attempts (last: {last})"
    )]
    HealthGateExhausted {
        port: u16,
        attempts: u32,
        last: String,
    },

    #[error("service on port {port} exited during startup ({status})")]
    ExitedEarly { port: u16, status: String },

    #[error("startup interrupted before the service became ready")]
    Interrupted,

    #[error("invalid lifecycle transition {from} -> {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}
