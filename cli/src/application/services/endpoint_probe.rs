//! Application service: issue one probe and classify the outcome.

use std::time::{Duration, Instant};

use funnelwatch_common::ProbeSpec;

use crate::application::ports::{HttpClient, HttpRequest, TransportError};
use crate::domain::{OutcomeKind, ProbeResult, classify_status, status_message};

/// Send `spec` against `base_url` with a bounded timeout.
///
/// Never fails: every transport problem becomes a failed `ProbeResult`.
/// There is no retry.
pub fn probe_endpoint(
    client: &impl HttpClient,
    base_url: &str,
    spec: &ProbeSpec,
    timeout: Duration,
) -> ProbeResult {
    let request = HttpRequest {
        method: spec.method,
        url: join_url(base_url, &spec.path),
        json: spec.payload.as_ref(),
        timeout,
    };

    let started = Instant::now();
    let outcome = client.send(&request);
    let elapsed = started.elapsed();

    let (kind, status, message) = match outcome {
        Ok(code) => (
            classify_status(&spec.expected, code),
            Some(code),
            status_message(&spec.expected, code),
        ),
        Err(TransportError::Timeout) => (
            OutcomeKind::Timeout,
            None,
            format!("no response within {}s", timeout.as_secs()),
        ),
        Err(TransportError::Connect(reason)) => (OutcomeKind::ConnectionError, None, reason),
        Err(TransportError::Protocol(reason)) => (OutcomeKind::HttpError, None, reason),
    };

    tracing::debug!(
        probe = %spec.label(),
        kind = %kind,
        status,
        elapsed_ms = elapsed.as_millis(),
        "probe finished"
    );

    ProbeResult {
        probe: spec.label(),
        kind,
        status,
        elapsed,
        message,
    }
}

/// `base` without trailing slashes, followed by `path`.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}
