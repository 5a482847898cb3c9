//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;
pub mod stop;

pub use ports::{
    ConfigStore, CycleObserver, HttpClient, HttpRequest, LaunchSpec, ManagedProcess, PortProbe,
    ProgressReporter, ServiceLauncher, TransportError,
};
pub use stop::StopToken;
