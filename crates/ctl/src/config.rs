// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;

/// Operator CLI for pipeline worker coordination.
#[derive(Debug, Parser)]
#[command(name = "pipectl", version, about)]
pub struct Config {
    #[command(flatten)]
    pub registry: RegistryConfig,

    /// Log level filter (tracing EnvFilter syntax).
    #[arg(long, default_value = "info", env = "PIPECTL_LOG")]
    pub log_level: String,

    /// Log format: text or json.
    #[arg(long, default_value = "text", env = "PIPECTL_LOG_FORMAT")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.log_format.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!("invalid log format: {other} (expected text or json)"),
        }
        if self.registry.prefix.is_empty() {
            anyhow::bail!("--prefix must not be empty");
        }
        if self.registry.prefix.contains('/') {
            anyhow::bail!("--prefix must be a single key segment");
        }
        Ok(())
    }
}

/// Coordination-store connection settings.
#[derive(Debug, clap::Args)]
pub struct RegistryConfig {
    /// NATS server URL for the coordination store.
    #[arg(long, default_value = "nats://127.0.0.1:4222", env = "PIPECTL_NATS_URL")]
    pub nats_url: String,

    /// JetStream KV bucket holding worker registrations.
    #[arg(long, default_value = "pipeline-workers", env = "PIPECTL_KV_BUCKET")]
    pub bucket: String,

    /// Key prefix the pipeline system registers under.
    #[arg(long, default_value = "pps", env = "PIPECTL_KEY_PREFIX")]
    pub prefix: String,

    /// Overall invocation timeout in milliseconds.
    #[arg(long, default_value_t = 30000, env = "PIPECTL_TIMEOUT_MS")]
    pub timeout_ms: u64,
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Query the status of every live worker.
    Status {
        /// Pipeline to query; omit for all pipelines.
        #[arg(long)]
        pipeline: Option<String>,
    },
    /// Cancel in-flight datums matching the filters for a job.
    Cancel {
        /// Pipeline whose workers to contact; omit for all pipelines.
        #[arg(long)]
        pipeline: Option<String>,

        /// Job whose datums to cancel.
        #[arg(long)]
        job: String,

        /// Worker-interpreted datum filters.
        #[arg(value_name = "FILTER")]
        filters: Vec<String>,
    },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
