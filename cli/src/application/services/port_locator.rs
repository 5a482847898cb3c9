//! Application service: choose a port from the candidate list.
//!
//! Both lookups are best-effort and never fail. Nothing is reserved, so a
//! port reported free can be taken by someone else before it is bound.

use funnelwatch_common::{CANDIDATE_PORTS, HttpMethod, base_url_for_port};

use crate::application::ports::{HttpClient, HttpRequest, PortProbe};

/// First candidate nobody is listening on, else the first candidate.
pub fn find_free(probe: &impl PortProbe, candidates: &[u16]) -> u16 {
    let port = candidates
        .iter()
        .copied()
        .find(|&port| !probe.is_listening(port))
        .unwrap_or_else(|| fallback(candidates));
    tracing::debug!(port, "selected free port");
    port
}

/// First candidate answering `GET /` with a 2xx status, else the first candidate.
pub fn find_active(
    client: &impl HttpClient,
    candidates: &[u16],
    timeout: std::time::Duration,
) -> u16 {
    let port = candidates
        .iter()
        .copied()
        .find(|&port| {
            let request = HttpRequest {
                method: HttpMethod::Get,
                url: format!("{}/", base_url_for_port(port)),
                json: None,
                timeout,
            };
            match client.send(&request) {
                Ok(status) => (200..300).contains(&status),
                Err(err) => {
                    tracing::debug!(port, %err, "candidate not active");
                    false
                }
            }
        })
        .unwrap_or_else(|| fallback(candidates));
    tracing::debug!(port, "selected active port");
    port
}

fn fallback(candidates: &[u16]) -> u16 {
    candidates.first().copied().unwrap_or(CANDIDATE_PORTS[0])
}
