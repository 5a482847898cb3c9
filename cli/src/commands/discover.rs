//! `funnelwatch discover`: find the candidate port serving the app.

use anyhow::Result;
use funnelwatch_common::{CANDIDATE_PORTS, base_url_for_port};

use crate::app::AppContext;
use crate::application::services::port_locator::find_active;
use crate::domain::RunOutcome;
use crate::infra::http::UreqClient;

/// Print the first active candidate URL, or the first candidate if none answer.
///
/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn run(app: &AppContext) -> Result<RunOutcome> {
    let client = UreqClient::default();
    let port = find_active(&client, &CANDIDATE_PORTS, app.config.probe.timeout());
    app.renderer()
        .render_discovered(&base_url_for_port(port), port)?;
    Ok(RunOutcome::Healthy)
}
