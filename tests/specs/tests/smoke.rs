// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that run the real `pipectl` binary.
//!
//! No coordination store is available here, so these cover the CLI
//! surface and the error-path exit codes.

use pipectl_specs::{run_pipectl, stderr, stdout};

#[test]
fn help_lists_both_operations() -> anyhow::Result<()> {
    let output = run_pipectl(&["--help"])?;
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("status"), "{text}");
    assert!(text.contains("cancel"), "{text}");
    Ok(())
}

#[test]
fn version_prints_and_exits_zero() -> anyhow::Result<()> {
    let output = run_pipectl(&["--version"])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("pipectl"));
    Ok(())
}

#[test]
fn invalid_log_format_is_a_usage_error() -> anyhow::Result<()> {
    let output = run_pipectl(&["--log-format", "yaml", "status"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid log format"));
    Ok(())
}

#[test]
fn cancel_without_job_is_rejected_by_clap() -> anyhow::Result<()> {
    let output = run_pipectl(&["cancel", "/shard-7"])?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn timeout_bounds_a_stalled_store_connection() -> anyhow::Result<()> {
    // A bound listener that never speaks the protocol: the TCP connect
    // succeeds, then the handshake stalls. The configured timeout must
    // cancel the invocation, not async-nats's own internal timeout.
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let url = format!("nats://{}", listener.local_addr()?);

    let started = std::time::Instant::now();
    let output = run_pipectl(&["--nats-url", &url, "--timeout-ms", "500", "status"])?;
    assert_eq!(output.status.code(), Some(130));
    assert!(
        started.elapsed() < std::time::Duration::from_secs(4),
        "took {:?}",
        started.elapsed()
    );
    Ok(())
}

#[test]
fn unreachable_store_exits_with_error() -> anyhow::Result<()> {
    // Nothing listens on port 1; discovery must fail, not hang.
    let output = run_pipectl(&[
        "--nats-url",
        "nats://127.0.0.1:1",
        "--timeout-ms",
        "5000",
        "status",
    ])?;
    assert_eq!(output.status.code(), Some(1));
    // The fatal log line goes through tracing, which writes to stdout.
    assert!(stdout(&output).contains("fatal"), "{}", stdout(&output));
    Ok(())
}
