//! funnelwatch stand-in service entry point.
//!
//! Initialises tracing, reads the bind port from `PORT` (the variable the
//! supervisor injects) and serves the canned route table until SIGINT or
//! SIGTERM arrives.

mod routes;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// ===================================================================
// Configuration
// ===================================================================

/// Server configuration loaded from environment variables via `envy`.
///
///   - `PORT` (default `3000`)
///   - `HOST` (default `127.0.0.1`)
#[derive(Debug, Deserialize)]
struct Config {
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default = "default_host")]
    host: String,
}

fn default_port() -> u16 {
    funnelwatch_common::CANDIDATE_PORTS[0]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

// ===================================================================
// Entry point
// ===================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config: Config = envy::from_env().context("failed to load config from PORT/HOST")?;
    let listen_addr = format!("{}:{}", config.host, config.port);

    let table = routes::default_table();
    tracing::info!(%listen_addr, routes = table.len(), "stand-in service starting");

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;

    axum::serve(listener, routes::build_router(table))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("stand-in service shut down");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("received shutdown signal");
}
