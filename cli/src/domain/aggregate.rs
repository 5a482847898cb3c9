//! Session totals, success rate and tier classification.
//!
//! Pure functions only. No I/O and no clock reads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::probe::Cycle;

// ── Tiers ─────────────────────────────────────────────────────────────────────

/// Success-rate classification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    Acceptable,
    Excellent,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent => "excellent",
            Self::Acceptable => "acceptable",
            Self::Critical => "critical",
        })
    }
}

/// Lower bounds (inclusive, in percent) for the upper two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    #[serde(default = "default_excellent")]
    pub excellent: f64,
    #[serde(default = "default_acceptable")]
    pub acceptable: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            acceptable: default_acceptable(),
        }
    }
}

fn default_excellent() -> f64 {
    90.0
}

fn default_acceptable() -> f64 {
    70.0
}

impl TierThresholds {
    /// Validate bounds are percentages and ordered.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is outside `0..=100` or `acceptable`
    /// exceeds `excellent`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("thresholds.excellent", self.excellent),
            ("thresholds.acceptable", self.acceptable),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.acceptable > self.excellent {
            return Err(ConfigError::ThresholdOrder {
                acceptable: self.acceptable,
                excellent: self.excellent,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn classify(&self, rate: f64) -> Tier {
        if rate >= self.excellent {
            Tier::Excellent
        } else if rate >= self.acceptable {
            Tier::Acceptable
        } else {
            Tier::Critical
        }
    }
}

// ── Rates ─────────────────────────────────────────────────────────────────────

/// `passed / total * 100`, rounded to one decimal. An empty total is `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // probe counts stay far below 2^52
pub fn success_rate(passed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = passed as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Counts and classification for one scope (a cycle or the whole session).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub passed: u64,
    pub total: u64,
    pub failed: u64,
    pub success_rate: f64,
    pub tier: Tier,
}

impl Summary {
    fn from_counts(passed: u64, total: u64, thresholds: &TierThresholds) -> Self {
        let success_rate = success_rate(passed, total);
        Self {
            passed,
            total,
            failed: total - passed,
            success_rate,
            tier: thresholds.classify(success_rate),
        }
    }

    /// No failed probe and not in the critical tier.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.failed == 0 && self.tier != Tier::Critical
    }
}

// ── Aggregator ────────────────────────────────────────────────────────────────

/// Accumulates completed cycles into session totals.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    thresholds: TierThresholds,
    cycles: u64,
    passed: u64,
    total: u64,
}

impl ResultAggregator {
    #[must_use]
    pub fn new(thresholds: TierThresholds) -> Self {
        Self {
            thresholds,
            cycles: 0,
            passed: 0,
            total: 0,
        }
    }

    /// Fold a completed cycle into the totals and return its own summary.
    pub fn record(&mut self, cycle: &Cycle) -> Summary {
        let passed = cycle.passed() as u64;
        let total = cycle.total() as u64;
        self.cycles += 1;
        self.passed += passed;
        self.total += total;
        Summary::from_counts(passed, total, &self.thresholds)
    }

    /// Cumulative summary across every recorded cycle.
    #[must_use]
    pub fn cumulative(&self) -> Summary {
        Summary::from_counts(self.passed, self.total, &self.thresholds)
    }

    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn errors(&self) -> u64 {
        self.total - self.passed
    }

    #[must_use]
    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
