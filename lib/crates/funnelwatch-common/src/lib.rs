pub mod catalog;
pub mod probe;

pub use catalog::{CANDIDATE_PORTS, DEFAULT_BASE_URL, PORT_ENV, base_url_for_port, default_probes};
pub use probe::{ExpectedStatus, HttpMethod, ProbeSpec, ProbeSpecError};
