// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(args: &[&str]) -> Config {
    match Config::try_parse_from(args) {
        Ok(config) => config,
        Err(e) => panic!("parse failed: {e}"),
    }
}

#[test]
fn status_defaults() {
    let config = parse(&["pipectl", "status"]);
    assert_eq!(config.registry.nats_url, "nats://127.0.0.1:4222");
    assert_eq!(config.registry.bucket, "pipeline-workers");
    assert_eq!(config.registry.prefix, "pps");
    assert_eq!(config.registry.timeout(), Duration::from_millis(30000));
    assert!(config.validate().is_ok());
    match config.command {
        Command::Status { pipeline } => assert!(pipeline.is_none()),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[test]
fn cancel_collects_positional_filters() {
    let config =
        parse(&["pipectl", "cancel", "--pipeline", "edges", "--job", "job-1", "/a", "/b"]);
    match config.command {
        Command::Cancel { pipeline, job, filters } => {
            assert_eq!(pipeline.as_deref(), Some("edges"));
            assert_eq!(job, "job-1");
            assert_eq!(filters, ["/a", "/b"]);
        }
        other => panic!("expected Cancel, got {other:?}"),
    }
}

#[test]
fn cancel_requires_job() {
    assert!(Config::try_parse_from(["pipectl", "cancel", "/a"]).is_err());
}

#[yare::parameterized(
    bad_format = { &["pipectl", "--log-format", "yaml", "status"] },
    multi_segment_prefix = { &["pipectl", "--prefix", "a/b", "status"] },
)]
fn validate_rejects(args: &[&str]) {
    let config = parse(args);
    assert!(config.validate().is_err());
}
