//! Unit tests for the funnelwatch CLI
//!
//! These tests drive the library through hand-written fakes and run fast
//! without external I/O.

mod architecture;
mod mocks;
mod monitor_service;
mod property_tests;
