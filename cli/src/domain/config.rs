//! Harness configuration schema and validation.
//!
//! Pure functions only. Loading from disk lives behind the `ConfigStore` port.

use std::collections::BTreeMap;
use std::time::Duration;

use funnelwatch_common::{ExpectedStatus, ProbeSpec, default_probes};
use serde::{Deserialize, Serialize};

use crate::domain::aggregate::TierThresholds;
use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.funnelwatch/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    pub thresholds: TierThresholds,
    pub probe: ProbeConfig,
    pub supervisor: SupervisorConfig,
    /// Per-path expected-status overrides, e.g. `/api/products: [200]`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub expectations: BTreeMap<String, Vec<u16>>,
    /// Replaces the built-in probe table entirely when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probes: Option<Vec<ProbeSpec>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Health gate and teardown tuning for supervised processes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default = "default_health_retries")]
    pub health_retries: u32,
    #[serde(default = "default_health_backoff_secs")]
    pub health_backoff_secs: u64,
    #[serde(default = "default_stop_grace_secs")]
    pub stop_grace_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            health_retries: default_health_retries(),
            health_backoff_secs: default_health_backoff_secs(),
            stop_grace_secs: default_stop_grace_secs(),
        }
    }
}

impl SupervisorConfig {
    #[must_use]
    pub fn health_backoff(&self) -> Duration {
        Duration::from_secs(self.health_backoff_secs)
    }

    #[must_use]
    pub fn stop_grace(&self) -> Duration {
        Duration::from_secs(self.stop_grace_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_health_retries() -> u32 {
    5
}

fn default_health_backoff_secs() -> u64 {
    2
}

fn default_stop_grace_secs() -> u64 {
    2
}

// ── Validation and derived values ────────────────────────────────────────────

impl HarnessConfig {
    /// Check every value is usable before a run starts.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.probe.timeout_secs == 0 {
            return Err(ConfigError::ZeroValue("probe.timeout_secs"));
        }
        if self.supervisor.health_retries == 0 {
            return Err(ConfigError::ZeroValue("supervisor.health_retries"));
        }
        if self.supervisor.stop_grace_secs == 0 {
            return Err(ConfigError::ZeroValue("supervisor.stop_grace_secs"));
        }
        self.probe_table().map(|_| ())
    }

    /// The ordered probe table for this session, with overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the table ends up empty, a probe is malformed,
    /// or an expectation override names a path no probe uses.
    pub fn probe_table(&self) -> Result<Vec<ProbeSpec>, ConfigError> {
        let mut probes = self.probes.clone().unwrap_or_else(default_probes);
        if probes.is_empty() {
            return Err(ConfigError::EmptyProbeTable);
        }
        for (path, codes) in &self.expectations {
            let mut matched = false;
            for probe in probes.iter_mut().filter(|p| &p.path == path) {
                probe.expected = ExpectedStatus::any_of(codes);
                matched = true;
            }
            if !matched {
                return Err(ConfigError::UnknownExpectationPath(path.clone()));
            }
        }
        for probe in &probes {
            probe.validate()?;
        }
        Ok(probes)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
