//! End-to-end single-shot monitoring against an in-process HTTP responder.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use predicates::prelude::*;

use crate::cli_tests::funnelwatch;

/// Serve forever on an ephemeral port; `status_for(method, path)` picks the reply.
pub fn spawn_responder(status_for: fn(&str, &str) -> u16) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream, status_for));
        }
    });
    format!("http://{addr}")
}

fn handle(stream: TcpStream, status_for: fn(&str, &str) -> u16) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut header = String::new();
    while reader.read_line(&mut header).is_ok_and(|n| n > 2) {
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
        header.clear();
    }
    let mut body = vec![0u8; content_length];
    let _ = reader.read_exact(&mut body);

    let status = status_for(&method, &path);
    let response =
        format!("HTTP/1.1 {status} Status\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
}

fn root_only(_method: &str, path: &str) -> u16 {
    if path == "/" { 200 } else { 404 }
}

pub fn healthy(_method: &str, path: &str) -> u16 {
    if path == "/api/auth/register" { 201 } else { 200 }
}

#[test]
fn test_single_shot_against_mostly_missing_routes_is_critical() {
    let url = spawn_responder(root_only);
    funnelwatch()
        .args(["--single", &url])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("10.0%"))
        .stdout(predicate::str::contains("critical"));
}

#[test]
fn test_single_shot_healthy_service_exits_zero() {
    let url = spawn_responder(healthy);
    funnelwatch()
        .args(["--single", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.0%"))
        .stdout(predicate::str::contains("excellent"));
}

#[test]
fn test_single_shot_json_report() {
    let url = spawn_responder(root_only);
    let output = funnelwatch()
        .args(["--single", "--json", &url])
        .output()
        .expect("run funnelwatch");
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a single JSON document");
    assert_eq!(report["target"], url.as_str());
    assert_eq!(report["mode"], "single-shot");
    assert_eq!(report["interrupted"], false);
    assert_eq!(report["cycles"], 1);
    assert_eq!(report["summary"]["passed"], 1);
    assert_eq!(report["summary"]["total"], 10);
    assert_eq!(report["summary"]["tier"], "critical");
    let results = report["last_cycle"]["results"].as_array().expect("results");
    assert_eq!(results.len(), 10);
    assert_eq!(results[1]["kind"], "unexpected-status");
    assert_eq!(results[1]["status"], 404);
}

#[test]
fn test_quiet_single_shot_prints_one_summary_line() {
    let url = spawn_responder(healthy);
    let output = funnelwatch()
        .args(["--single", "-q", &url])
        .output()
        .expect("run funnelwatch");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    assert_eq!(stdout.lines().count(), 1, "{stdout}");
    assert!(stdout.contains("10/10 passed"), "{stdout}");
}

#[test]
fn test_unreachable_target_is_degraded_not_fatal() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    funnelwatch()
        .args(["--single", &format!("http://127.0.0.1:{port}")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("connection-error"));
}
