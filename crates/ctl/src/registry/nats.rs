// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! NATS JetStream KV implementation of the worker registry.

use futures_util::TryStreamExt;

use crate::registry::WorkerRegistry;

/// Worker registry backed by a JetStream KV bucket.
pub struct NatsRegistry {
    store: async_nats::jetstream::kv::Store,
}

impl NatsRegistry {
    /// Connect to the NATS server at `url` and open the KV bucket.
    pub async fn connect(url: &str, bucket: &str) -> anyhow::Result<Self> {
        let client = async_nats::connect(url).await?;
        let jetstream = async_nats::jetstream::new(client);
        let store = jetstream.get_key_value(bucket).await?;
        Ok(Self { store })
    }

    /// Wrap an already-open KV store handle.
    pub fn new(store: async_nats::jetstream::kv::Store) -> Self {
        Self { store }
    }

    /// Register a worker key. The value is unused by discovery.
    ///
    /// Workers call this on startup; the coordinator's resolution paths
    /// never write.
    pub async fn register(&self, key: &str) -> anyhow::Result<()> {
        self.store.put(key, bytes::Bytes::new()).await?;
        Ok(())
    }

    /// Remove a worker key on shutdown.
    pub async fn deregister(&self, key: &str) -> anyhow::Result<()> {
        self.store.purge(key).await?;
        Ok(())
    }
}

#[tonic::async_trait]
impl WorkerRegistry for NatsRegistry {
    async fn list(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let mut keys = self.store.keys().await?;
        let mut matched = Vec::new();
        while let Some(key) = keys.try_next().await? {
            if key.starts_with(prefix) {
                matched.push(key);
            }
        }
        // KV key listing order is unspecified; sort so resolution order is
        // stable across calls.
        matched.sort();
        Ok(matched)
    }
}
