//! funnelwatch - endpoint health checks and service supervision for web apps

use std::process::ExitCode;

use clap::Parser;
use funnelwatch_cli::application::StopToken;
use funnelwatch_cli::cli::Cli;
use funnelwatch_cli::domain::RunOutcome;
use funnelwatch_cli::infra::{logging, signal};
use funnelwatch_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.no_color);
    let as_json = cli.json;

    let stop = StopToken::new();
    signal::install(&stop);

    let outcome = match tokio::task::spawn_blocking(move || cli.run(stop)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            report_fatal(as_json, &format!("{e:#}"));
            RunOutcome::InternalError
        }
        Err(e) => {
            report_fatal(as_json, &format!("worker thread failed: {e}"));
            RunOutcome::InternalError
        }
    };
    tracing::debug!(?outcome, "exiting");
    ExitCode::from(outcome.exit_code())
}

fn report_fatal(as_json: bool, message: &str) {
    if as_json {
        if let Ok(obj) = json::format_error(message, "internal-error") {
            println!("{obj}");
            return;
        }
    }
    eprintln!("Error: {message}");
}
