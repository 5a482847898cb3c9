//! `HttpClient` port backed by a blocking `ureq` agent.

use std::error::Error as _;
use std::io;

use ureq::ErrorKind;

use crate::application::ports::{HttpClient, HttpRequest, TransportError};

const USER_AGENT: &str = concat!("funnelwatch/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: u32 = 5;

/// Blocking HTTP client. Status codes of every class are returned as `Ok`.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl Default for UreqClient {
    fn default() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .redirects(MAX_REDIRECTS)
                .user_agent(USER_AGENT)
                .build(),
        }
    }
}

impl HttpClient for UreqClient {
    fn send(&self, request: &HttpRequest<'_>) -> Result<u16, TransportError> {
        let call = self
            .agent
            .request(request.method.as_str(), &request.url)
            .timeout(request.timeout);
        let outcome = match request.json {
            Some(body) => call.send_json(body),
            None => call.call(),
        };
        match outcome {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(ureq::Error::Transport(transport)) => Err(classify_transport(&transport)),
        }
    }
}

fn classify_transport(transport: &ureq::Transport) -> TransportError {
    if timed_out(transport) {
        return TransportError::Timeout;
    }
    let detail = transport.to_string();
    match transport.kind() {
        ErrorKind::Dns
        | ErrorKind::ConnectionFailed
        | ErrorKind::Io
        | ErrorKind::ProxyConnect
        | ErrorKind::InvalidProxyUrl
        | ErrorKind::ProxyUnauthorized => TransportError::Connect(detail),
        _ => TransportError::Protocol(detail),
    }
}

fn timed_out(transport: &ureq::Transport) -> bool {
    let mut source = transport.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) {
                return true;
            }
        }
        source = err.source();
    }
    false
}
