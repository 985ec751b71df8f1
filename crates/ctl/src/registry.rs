// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination-store access.
//!
//! The coordinator consumes the store through one narrow interface: a
//! prefix-scan read over worker registration keys. The store itself is
//! external and opaque; the only production implementation here is backed
//! by a NATS JetStream KV bucket.

pub mod nats;

/// Read-only view of the worker registration keyspace.
#[tonic::async_trait]
pub trait WorkerRegistry: Send + Sync {
    /// One prefix-scan read.
    ///
    /// Returns every full key starting with `prefix`, in the store's
    /// stable order (lexicographic). Resolution order downstream is
    /// exactly this order. An empty result is not an error.
    async fn list(&self, prefix: &str) -> anyhow::Result<Vec<String>>;
}
