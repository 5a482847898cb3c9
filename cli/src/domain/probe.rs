//! Probe outcome types and the pure status classification rules.
//!
//! This module is intentionally free of I/O. The HTTP exchange itself lives
//! behind the `HttpClient` port; everything here takes data in and returns
//! data out.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use funnelwatch_common::ExpectedStatus;
use serde::Serialize;

// ── Types ─────────────────────────────────────────────────────────────────────

/// How a single probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    /// Status code was in the probe's expected set.
    Success,
    /// A response arrived with a status outside the expected set.
    UnexpectedStatus,
    /// The exchange started but the response was unusable (bad status line,
    /// bad headers, redirect loop, invalid URL).
    HttpError,
    /// No response: refused, reset, DNS failure.
    ConnectionError,
    /// The bounded request timeout elapsed.
    Timeout,
}

impl OutcomeKind {
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::UnexpectedStatus => "unexpected-status",
            Self::HttpError => "http-error",
            Self::ConnectionError => "connection-error",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one probe within one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// Label of the probe this result belongs to, e.g. `GET /login`.
    pub probe: String,
    pub kind: OutcomeKind,
    /// Observed status code, if a response arrived.
    pub status: Option<u16>,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub message: String,
}

impl ProbeResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.kind.is_success()
    }
}

/// One complete pass through the probe table. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Cycle {
    sequence: u64,
    started_at: DateTime<Local>,
    #[serde(serialize_with = "serialize_millis")]
    elapsed: Duration,
    results: Vec<ProbeResult>,
}

impl Cycle {
    #[must_use]
    pub fn new(
        sequence: u64,
        started_at: DateTime<Local>,
        elapsed: Duration,
        results: Vec<ProbeResult>,
    ) -> Self {
        Self {
            sequence,
            started_at,
            elapsed,
            results,
        }
    }

    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.total() - self.passed()
    }
}

// ── Pure functions ────────────────────────────────────────────────────────────

/// Classify a received status against the expected set.
#[must_use]
pub fn classify_status(expected: &ExpectedStatus, status: u16) -> OutcomeKind {
    if expected.contains(status) {
        OutcomeKind::Success
    } else {
        OutcomeKind::UnexpectedStatus
    }
}

/// Human-readable message for a received status.
#[must_use]
pub fn status_message(expected: &ExpectedStatus, status: u16) -> String {
    if expected.contains(status) {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status} (expected {expected})")
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's serialize_with signature
fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
