//! Bridges OS interrupt signals to the blocking core's `StopToken`.

use crate::application::StopToken;

/// Raise `token` on Ctrl-C (and `SIGTERM` on Unix).
///
/// Must be called from within a Tokio runtime.
pub fn install(token: &StopToken) {
    let token = token.clone();
    tokio::spawn(async move {
        wait_for_interrupt().await;
        tracing::info!("interrupt received, stopping");
        token.stop();
    });
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    if let Err(err) = res {
                        tracing::warn!("cannot listen for ctrl-c: {err}");
                        std::future::pending::<()>().await;
                    }
                }
                _ = term.recv() => {}
            }
        }
        Err(err) => {
            tracing::warn!("cannot listen for SIGTERM: {err}");
            ctrl_c_or_pending().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    ctrl_c_or_pending().await;
}

async fn ctrl_c_or_pending() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}
