// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: in-memory registry, fake workers with
//! connection accounting, and an in-process gRPC worker server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::discover::Endpoint;
use crate::registry::WorkerRegistry;
use crate::worker::{proto, CancelRequest, StatusReport, WorkerConnector, WorkerHandle};

/// In-memory registry: a sorted list of registration keys.
///
/// Mirrors the store contract: prefix-scan returns matching keys in
/// lexicographic order, and listing has no side effects.
#[derive(Default)]
pub struct MemRegistry {
    keys: Mutex<Vec<String>>,
    fail: Mutex<Option<String>>,
}

impl MemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a full key, e.g. `pps/workers/edges/host-0`.
    pub fn register(&self, key: &str) {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        keys.push(key.to_owned());
        keys.sort();
    }

    /// Make every subsequent `list` fail, simulating an unreachable store.
    pub fn fail_with(&self, message: &str) {
        *self.fail.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_owned());
    }
}

#[tonic::async_trait]
impl WorkerRegistry for MemRegistry {
    async fn list(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        if let Some(message) = &*self.fail.lock().unwrap_or_else(PoisonError::into_inner) {
            anyhow::bail!("{message}");
        }
        let keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(keys.iter().filter(|k| k.starts_with(prefix)).cloned().collect())
    }
}

/// Open/close accounting shared between a [`FakeConnector`] and its handles.
#[derive(Default)]
pub struct ConnCounts {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl ConnCounts {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// True when every opened connection has been closed.
    pub fn balanced(&self) -> bool {
        self.opened() == self.closed()
    }
}

/// Scripted behavior for one fake worker.
#[derive(Clone, Default)]
pub struct FakeWorkerSpec {
    pub status: StatusReport,
    pub connect_error: Option<String>,
    pub rpc_error: Option<String>,
    pub cancel_success: bool,
    /// RPCs never complete; for cancellation-context tests.
    pub hang: bool,
}

impl FakeWorkerSpec {
    /// A reachable worker reporting the given identity and no cancel match.
    pub fn healthy(worker_id: &str) -> Self {
        Self {
            status: StatusReport { worker_id: worker_id.to_owned(), ..Default::default() },
            ..Default::default()
        }
    }

    pub fn cancels(mut self) -> Self {
        self.cancel_success = true;
        self
    }

    pub fn connect_fails(mut self, message: &str) -> Self {
        self.connect_error = Some(message.to_owned());
        self
    }

    pub fn rpc_fails(mut self, message: &str) -> Self {
        self.rpc_error = Some(message.to_owned());
        self
    }

    pub fn hangs(mut self) -> Self {
        self.hang = true;
        self
    }
}

/// `(host, request)` pairs in the order workers received them. Clonable
/// handle so tests can keep one after the connector moves into a
/// coordinator.
#[derive(Clone, Default)]
pub struct CancelLog(Arc<Mutex<Vec<(String, CancelRequest)>>>);

impl CancelLog {
    pub fn snapshot(&self) -> Vec<(String, CancelRequest)> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn push(&self, host: &str, request: &CancelRequest) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((host.to_owned(), request.clone()));
    }
}

/// Connector serving scripted [`FakeWorkerSpec`]s by host, with open/close
/// accounting and a log of cancel requests each worker received.
#[derive(Default)]
pub struct FakeConnector {
    workers: HashMap<String, FakeWorkerSpec>,
    counts: Arc<ConnCounts>,
    cancel_log: CancelLog,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker(mut self, host: &str, spec: FakeWorkerSpec) -> Self {
        self.workers.insert(host.to_owned(), spec);
        self
    }

    pub fn counts(&self) -> Arc<ConnCounts> {
        Arc::clone(&self.counts)
    }

    pub fn cancel_log(&self) -> CancelLog {
        self.cancel_log.clone()
    }
}

#[tonic::async_trait]
impl WorkerConnector for FakeConnector {
    async fn connect(&self, endpoint: &Endpoint) -> anyhow::Result<Box<dyn WorkerHandle>> {
        let spec = self
            .workers
            .get(&endpoint.host)
            .ok_or_else(|| anyhow::anyhow!("no fake worker registered for {}", endpoint.host))?
            .clone();
        if let Some(message) = &spec.connect_error {
            anyhow::bail!("{message}");
        }
        self.counts.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeWorker {
            host: endpoint.host.clone(),
            spec,
            counts: Arc::clone(&self.counts),
            cancel_log: self.cancel_log.clone(),
        }))
    }
}

struct FakeWorker {
    host: String,
    spec: FakeWorkerSpec,
    counts: Arc<ConnCounts>,
    cancel_log: CancelLog,
}

#[tonic::async_trait]
impl WorkerHandle for FakeWorker {
    async fn get_status(&mut self) -> anyhow::Result<StatusReport> {
        if self.spec.hang {
            std::future::pending::<()>().await;
        }
        if let Some(message) = &self.spec.rpc_error {
            anyhow::bail!("{message}");
        }
        Ok(self.spec.status.clone())
    }

    async fn cancel_datum(&mut self, request: &CancelRequest) -> anyhow::Result<bool> {
        if self.spec.hang {
            std::future::pending::<()>().await;
        }
        self.cancel_log.push(&self.host, request);
        if let Some(message) = &self.spec.rpc_error {
            anyhow::bail!("{message}");
        }
        Ok(self.spec.cancel_success)
    }

    async fn close(self: Box<Self>) {
        self.counts.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-process gRPC worker with fixed responses.
#[derive(Debug, Clone, Default)]
pub struct StubWorker {
    pub status: StatusReport,
    pub cancel_success: bool,
    pub fail_rpcs: bool,
}

#[tonic::async_trait]
impl proto::worker_server::Worker for StubWorker {
    async fn get_status(
        &self,
        _request: tonic::Request<proto::GetStatusRequest>,
    ) -> Result<tonic::Response<proto::WorkerStatus>, tonic::Status> {
        if self.fail_rpcs {
            return Err(tonic::Status::internal("injected worker fault"));
        }
        Ok(tonic::Response::new(self.status.clone()))
    }

    async fn cancel_datum(
        &self,
        _request: tonic::Request<proto::CancelDatumRequest>,
    ) -> Result<tonic::Response<proto::CancelDatumResponse>, tonic::Status> {
        if self.fail_rpcs {
            return Err(tonic::Status::internal("injected worker fault"));
        }
        Ok(tonic::Response::new(proto::CancelDatumResponse { success: self.cancel_success }))
    }
}

/// Spawn a [`StubWorker`] gRPC server on an ephemeral local port.
pub async fn spawn_worker_server(
    stub: StubWorker,
) -> anyhow::Result<(std::net::SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let incoming = tokio_stream::wrappers::TcpListenerStream::new(listener);
    let handle = tokio::spawn(async move {
        let _ = tonic::transport::Server::builder()
            .add_service(proto::worker_server::WorkerServer::new(stub))
            .serve_with_incoming(incoming)
            .await;
    });
    Ok((addr, handle))
}
