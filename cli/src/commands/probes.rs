//! `funnelwatch probes`: list the probe table in effect.

use anyhow::Result;

use crate::app::AppContext;
use crate::domain::RunOutcome;

/// # Errors
///
/// Returns an error if JSON rendering fails.
pub fn run(app: &AppContext) -> Result<RunOutcome> {
    app.renderer().render_probe_table(&app.probes)?;
    Ok(RunOutcome::Healthy)
}
