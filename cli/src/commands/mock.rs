//! `funnelwatch mock`: run the stand-in service under supervision.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::LaunchSpec;
use crate::commands::{WatchArgs, supervise};
use crate::domain::RunOutcome;

/// Binary name of the stand-in service.
pub const STUB_BIN: &str = "funnelwatch-stub";

/// The stand-in service boots fast, so it gets a short grace period.
const STUB_GRACE: Duration = Duration::from_secs(3);

/// Arguments for the mock command.
#[derive(Args, Debug, Clone)]
pub struct MockArgs {
    /// Path to the stand-in binary (default: next to this executable, else PATH)
    #[arg(long, value_name = "PATH")]
    pub stub_bin: Option<PathBuf>,

    /// Show the stand-in service's own logs
    #[arg(long)]
    pub show_output: bool,

    #[command(flatten)]
    pub watch: WatchArgs,
}

/// Locate the stand-in binary: explicit path, sibling of `current_exe`, or bare name.
#[must_use]
pub fn resolve_stub(explicit: Option<&Path>, current_exe: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let file_name = format!("{STUB_BIN}{}", std::env::consts::EXE_SUFFIX);
    current_exe
        .and_then(Path::parent)
        .map(|dir| dir.join(&file_name))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Launch, gate, check and tear down the stand-in service.
///
/// # Errors
///
/// Returns an error if reporting or teardown fails unexpectedly.
pub fn run(app: &AppContext, args: &MockArgs) -> Result<RunOutcome> {
    let exe = std::env::current_exe().ok();
    let stub = resolve_stub(args.stub_bin.as_deref(), exe.as_deref());
    tracing::debug!(stub = %stub.display(), "resolved stand-in binary");
    let spec = LaunchSpec {
        program: stub.to_string_lossy().into_owned(),
        args: Vec::new(),
        startup_grace: STUB_GRACE,
    };
    supervise(app, &spec, &args.watch, args.show_output)
}
