//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP requests, TCP port
//! checks, process spawning and termination, config loading, signal hooks.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod http;
pub mod logging;
pub mod net;
pub mod process;
pub mod signal;
