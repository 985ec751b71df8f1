// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker endpoint discovery.
//!
//! Workers register themselves under
//! `<prefix>/workers/<pipeline>/<host>` in the coordination store. The
//! resolver prefix-scans that keyspace and interprets each key's final
//! segment as a worker's host identity. The key's value is ignored.

use tokio_util::sync::CancellationToken;

use crate::error::CoordError;
use crate::registry::WorkerRegistry;

/// Fixed keyspace segment worker registrations live under.
pub const WORKERS_SEGMENT: &str = "workers";

/// Which worker group to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every pipeline's workers.
    All,
    /// One pipeline's worker group.
    Pipeline(String),
}

impl Scope {
    /// Build a scope from an optional `--pipeline` argument.
    pub fn from_pipeline(pipeline: Option<String>) -> Self {
        match pipeline {
            Some(name) if !name.is_empty() => Self::Pipeline(name),
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "",
            Self::Pipeline(name) => name,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("<all>"),
            Self::Pipeline(name) => f.write_str(name),
        }
    }
}

/// A worker's network identity: the host parsed from its registration key.
///
/// The RPC port is fixed and well-known, so the host is the whole address.
/// Duplicates within one resolution are preserved, not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
}

/// Build the store key prefix for a scope.
///
/// The trailing separator is load-bearing: without it, pipeline `edges`
/// would also match workers registered under `edges2`.
pub fn key_prefix(prefix: &str, scope: &Scope) -> String {
    match scope {
        Scope::All => format!("{prefix}/{WORKERS_SEGMENT}/"),
        Scope::Pipeline(name) => format!("{prefix}/{WORKERS_SEGMENT}/{name}/"),
    }
}

/// Parse a worker host identity out of a full registration key.
fn parse_host(key: &str) -> anyhow::Result<Endpoint> {
    let host = key.rsplit('/').next().unwrap_or("");
    if host.is_empty() {
        anyhow::bail!("malformed worker key {key:?}: empty host segment");
    }
    Ok(Endpoint { host: host.to_owned() })
}

/// Resolve a scope into the ordered set of live worker endpoints.
///
/// One prefix-scan read against the store, no side effects. Key order is
/// preserved as returned by the registry (stable, lexicographic), which
/// fixes the order of the downstream status aggregation. Zero matches is
/// a valid, non-error result.
pub async fn resolve(
    registry: &dyn WorkerRegistry,
    prefix: &str,
    scope: &Scope,
    ctx: &CancellationToken,
) -> Result<Vec<Endpoint>, CoordError> {
    let key_prefix = key_prefix(prefix, scope);
    let keys = tokio::select! {
        biased;
        _ = ctx.cancelled() => return Err(CoordError::Cancelled),
        result = registry.list(&key_prefix) => result.map_err(CoordError::Discovery)?,
    };

    let mut endpoints = Vec::with_capacity(keys.len());
    for key in &keys {
        endpoints.push(parse_host(key).map_err(CoordError::Discovery)?);
    }
    tracing::debug!(scope = %scope, workers = endpoints.len(), "resolved worker endpoints");
    Ok(endpoints)
}

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
