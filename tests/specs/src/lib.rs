// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Runs the real `pipectl` binary as a subprocess and checks CLI surface
//! and error-path exit codes without needing a live cluster.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Resolve the path to the compiled `pipectl` binary.
pub fn pipectl_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("pipectl")
}

/// Run `pipectl` with the given arguments and capture its output.
pub fn run_pipectl(args: &[&str]) -> anyhow::Result<Output> {
    let binary = pipectl_binary();
    anyhow::ensure!(binary.exists(), "pipectl binary not found at {}", binary.display());
    Ok(Command::new(binary).args(args).output()?)
}

/// Stdout as UTF-8, lossy.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as UTF-8, lossy.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
