use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP method used by a probe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ProbeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(ProbeSpecError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Errors raised while building or validating a probe definition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeSpecError {
    #[error("unsupported HTTP method '{0}' (expected GET or POST)")]
    UnsupportedMethod(String),

    #[error("probe path must start with '/': {0}")]
    RelativePath(String),

    #[error("probe {0} has an empty expected-status set")]
    NoExpectedStatus(String),

    #[error("status code {0} is outside 100..=599")]
    InvalidStatus(u16),
}

/// Set of status codes a probe accepts as success.
///
/// Serialized as a plain list, e.g. `[200, 401]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ExpectedStatus(Vec<u16>);

impl ExpectedStatus {
    #[must_use]
    pub fn one(code: u16) -> Self {
        Self(vec![code])
    }

    /// Build a set from several codes. Duplicates are dropped, order kept.
    #[must_use]
    pub fn any_of(codes: &[u16]) -> Self {
        let mut set: Vec<u16> = Vec::with_capacity(codes.len());
        for code in codes {
            if !set.contains(code) {
                set.push(*code);
            }
        }
        Self(set)
    }

    #[must_use]
    pub fn contains(&self, code: u16) -> bool {
        self.0.contains(&code)
    }

    #[must_use]
    pub fn codes(&self) -> &[u16] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join("|");
        f.write_str(&joined)
    }
}

/// One configured HTTP request with its expected outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeSpec {
    pub method: HttpMethod,
    pub path: String,
    /// JSON body sent with `Content-Type: application/json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub expected: ExpectedStatus,
}

impl ProbeSpec {
    #[must_use]
    pub fn get(path: &str, expected: ExpectedStatus) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.to_string(),
            payload: None,
            expected,
        }
    }

    #[must_use]
    pub fn post(path: &str, payload: serde_json::Value, expected: ExpectedStatus) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.to_string(),
            payload: Some(payload),
            expected,
        }
    }

    /// Short label used in per-probe output lines, e.g. `GET /login`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Check the definition is usable before a session starts.
    pub fn validate(&self) -> Result<(), ProbeSpecError> {
        if !self.path.starts_with('/') {
            return Err(ProbeSpecError::RelativePath(self.path.clone()));
        }
        if self.expected.is_empty() {
            return Err(ProbeSpecError::NoExpectedStatus(self.label()));
        }
        if let Some(bad) = self
            .expected
            .codes()
            .iter()
            .find(|c| !(100..=599).contains(*c))
        {
            return Err(ProbeSpecError::InvalidStatus(*bad));
        }
        Ok(())
    }
}
