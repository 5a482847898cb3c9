//! TCP reachability checks for port discovery.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::application::ports::PortProbe;

/// Treats a port as taken when a local TCP connect succeeds.
pub struct TcpPortProbe {
    timeout: Duration,
}

impl Default for TcpPortProbe {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(500),
        }
    }
}

impl PortProbe for TcpPortProbe {
    fn is_listening(&self, port: u16) -> bool {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listening = TcpStream::connect_timeout(&addr, self.timeout).is_ok();
        tracing::trace!(port, listening, "port check");
        listening
    }
}
