//! Default probe table and port constants shared by every entry point.

use serde_json::json;

use crate::probe::{ExpectedStatus, ProbeSpec};

/// Ports considered during port discovery, in priority order.
pub const CANDIDATE_PORTS: [u16; 3] = [3000, 3001, 3002];

/// Environment variable injected into spawned services to bind them to a port.
pub const PORT_ENV: &str = "PORT";

/// Base URL used when none is given on the command line.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[must_use]
pub fn base_url_for_port(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// The fixed, ordered probe set exercised against the web service.
///
/// `/api/products` accepts 401 as well as 200: an access-controlled listing
/// is treated as a secure success. Callers may narrow that through config.
#[must_use]
pub fn default_probes() -> Vec<ProbeSpec> {
    let ok = || ExpectedStatus::one(200);
    vec![
        ProbeSpec::get("/", ok()),
        ProbeSpec::get("/login", ok()),
        ProbeSpec::get("/register", ok()),
        ProbeSpec::get("/auth/forgot-password", ok()),
        ProbeSpec::get("/api/health", ok()),
        ProbeSpec::get("/api/products", ExpectedStatus::any_of(&[200, 401])),
        ProbeSpec::post(
            "/api/auth/login",
            json!({ "email": "test@test.com", "password": "password123" }),
            ok(),
        ),
        ProbeSpec::post(
            "/api/auth/register",
            json!({ "email": "test@example.com", "password": "password123" }),
            ExpectedStatus::one(201),
        ),
        ProbeSpec::post(
            "/api/auth/forgot-password",
            json!({ "email": "test@test.com" }),
            ok(),
        ),
        ProbeSpec::post(
            "/api/public/orders",
            json!({ "productId": "1", "quantity": 1, "customerEmail": "test@example.com" }),
            ok(),
        ),
    ]
}
