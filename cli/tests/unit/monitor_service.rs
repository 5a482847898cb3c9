//! Monitor loop behaviour against scripted HTTP replies.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

use std::time::Duration;

use chrono::Local;
use funnelwatch_cli::application::StopToken;
use funnelwatch_cli::application::ports::TransportError;
use funnelwatch_cli::application::services::monitor::{LoopExit, MonitorLoop};
use funnelwatch_cli::domain::{
    MonitorSession, OutcomeKind, RunMode, RunOutcome, Tier, TierThresholds,
};
use funnelwatch_common::default_probes;

use crate::mocks::{PathClient, RecordingObserver};

fn single_shot(target: &str) -> MonitorSession {
    MonitorSession::new(
        target,
        Duration::from_secs(30),
        RunMode::SingleShot,
        TierThresholds::default(),
        Local::now(),
    )
}

/// Replies that satisfy every entry of the default probe table.
fn healthy_client() -> PathClient {
    PathClient::all(200).with("/api/auth/register", Ok(201))
}

#[test]
fn test_healthy_service_scores_excellent_and_exits_zero() {
    let probes = default_probes();
    let client = healthy_client();
    let monitor = MonitorLoop {
        client: &client,
        probes: &probes,
        timeout: Duration::from_secs(1),
    };
    let mut session = single_shot("http://localhost:3000");
    let observer = RecordingObserver::default();

    let exit = monitor.run(&mut session, &StopToken::new(), &observer);

    assert_eq!(exit, LoopExit::Completed);
    let summary = session.final_summary();
    assert_eq!(summary.passed, 10);
    assert_eq!(summary.success_rate, 100.0);
    assert_eq!(summary.tier, Tier::Excellent);
    assert_eq!(RunOutcome::from_summary(&summary), RunOutcome::Healthy);
}

#[test]
fn test_access_controlled_listing_counts_as_success() {
    let probes = default_probes();
    let client = healthy_client().with("/api/products", Ok(401));
    let monitor = MonitorLoop {
        client: &client,
        probes: &probes,
        timeout: Duration::from_secs(1),
    };
    let mut session = single_shot("http://localhost:3000");

    monitor.run(&mut session, &StopToken::new(), &RecordingObserver::default());

    assert_eq!(session.final_summary().passed, 10);
}

#[test]
fn test_failures_are_classified_per_probe() {
    let probes = default_probes();
    let client = healthy_client()
        .with("/login", Ok(500))
        .with("/api/health", Err(TransportError::Timeout))
        .with(
            "/api/public/orders",
            Err(TransportError::Connect("refused".to_string())),
        );
    let monitor = MonitorLoop {
        client: &client,
        probes: &probes,
        timeout: Duration::from_secs(1),
    };
    let mut session = single_shot("http://localhost:3000/");
    let observer = RecordingObserver::default();

    monitor.run(&mut session, &StopToken::new(), &observer);

    let results = observer.results.borrow();
    let kind_of = |label: &str| {
        results
            .iter()
            .find(|r| r.probe == label)
            .map(|r| r.kind)
            .expect("probe result present")
    };
    assert_eq!(kind_of("GET /login"), OutcomeKind::UnexpectedStatus);
    assert_eq!(kind_of("GET /api/health"), OutcomeKind::Timeout);
    assert_eq!(
        kind_of("POST /api/public/orders"),
        OutcomeKind::ConnectionError
    );

    let summary = session.final_summary();
    assert_eq!(summary.passed, 7);
    assert_eq!(summary.success_rate, 70.0);
    assert_eq!(summary.tier, Tier::Acceptable);
    assert_eq!(session.error_count(), 3);
    assert_eq!(RunOutcome::from_summary(&summary), RunOutcome::Degraded);
}

#[test]
fn test_trailing_slash_on_target_does_not_double_up() {
    let probes = default_probes();
    let client = healthy_client();
    let monitor = MonitorLoop {
        client: &client,
        probes: &probes,
        timeout: Duration::from_secs(1),
    };
    let mut session = single_shot("http://localhost:3000/");

    monitor.run(&mut session, &StopToken::new(), &RecordingObserver::default());

    let sent = client.sent.borrow();
    assert_eq!(sent[0], "http://localhost:3000/");
    assert_eq!(sent[1], "http://localhost:3000/login");
    assert!(sent.iter().all(|url| !url.contains(":3000//")));
}

#[test]
fn test_unreachable_service_is_critical() {
    let probes = default_probes();
    let client = PathClient::refusing();
    let monitor = MonitorLoop {
        client: &client,
        probes: &probes,
        timeout: Duration::from_secs(1),
    };
    let mut session = single_shot("http://localhost:3000");

    monitor.run(&mut session, &StopToken::new(), &RecordingObserver::default());

    let summary = session.final_summary();
    assert_eq!(summary.passed, 0);
    assert_eq!(summary.success_rate, 0.0);
    assert_eq!(summary.tier, Tier::Critical);
}
