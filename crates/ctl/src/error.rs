// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Errors surfaced by one coordination invocation.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug)]
pub enum CoordError {
    /// The coordination-store read failed or returned an unparseable key.
    Discovery(anyhow::Error),
    /// Transport dial to a worker failed.
    Connect {
        endpoint: String,
        source: anyhow::Error,
    },
    /// A reachable worker's RPC call failed.
    Rpc {
        endpoint: String,
        source: anyhow::Error,
    },
    /// Every contacted worker completed the cancel call but none matched.
    ///
    /// Carries the original job ID and filters for the caller to log.
    /// Zero resolved workers also lands here: nobody confirmed, no success.
    DatumNotFound {
        job_id: String,
        data_filters: Vec<String>,
    },
    /// The caller's cancellation context fired mid-invocation.
    Cancelled,
}

impl CoordError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery(_) => "DISCOVERY",
            Self::Connect { .. } => "CONNECT",
            Self::Rpc { .. } => "RPC",
            Self::DatumNotFound { .. } => "DATUM_NOT_FOUND",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Process exit code for the CLI. Not-found is a distinct, expected
    /// outcome and gets its own code so scripts can branch on it.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DatumNotFound { .. } => 3,
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "worker discovery failed: {e}"),
            Self::Connect { endpoint, source } => {
                write!(f, "failed to dial worker {endpoint}: {source}")
            }
            Self::Rpc { endpoint, source } => {
                write!(f, "rpc to worker {endpoint} failed: {source}")
            }
            Self::DatumNotFound { job_id, data_filters } => {
                write!(
                    f,
                    "datum matching filters {data_filters:?} could not be found for job {job_id}"
                )
            }
            Self::Cancelled => f.write_str("operation cancelled"),
        }
    }
}

impl std::error::Error for CoordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) | Self::Connect { source: e, .. } | Self::Rpc { source: e, .. } => {
                Some(&**e)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
