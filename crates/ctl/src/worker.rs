// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-worker RPC surface the coordinator consumes.

pub mod grpc;

use crate::discover::Endpoint;

/// Generated protobuf types for the `worker.v1` package.
pub mod proto {
    tonic::include_proto!("worker.v1");
}

/// Fixed, well-known port every worker serves its RPC surface on.
///
/// Deliberately not caller-configurable: a worker's registered host
/// identity is its whole address.
pub const WORKER_RPC_PORT: u16 = 1080;

/// Per-worker status payload. Collected, never interpreted, by the
/// coordinator.
pub type StatusReport = proto::WorkerStatus;

/// Describes which in-flight datums to cancel. Filters are
/// worker-interpreted and opaque here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub job_id: String,
    pub data_filters: Vec<String>,
}

/// A live, call-ready reference to one worker.
///
/// Owned exclusively by one fan-out invocation. [`close`] must run on
/// every exit path — success, error, or cancellation — so repeated
/// polling cannot accumulate connections.
///
/// [`close`]: WorkerHandle::close
#[tonic::async_trait]
pub trait WorkerHandle: Send {
    async fn get_status(&mut self) -> anyhow::Result<StatusReport>;

    /// Returns whether this worker found and canceled a matching datum.
    async fn cancel_datum(&mut self, request: &CancelRequest) -> anyhow::Result<bool>;

    /// Release the underlying transport.
    async fn close(self: Box<Self>);
}

/// Turns one endpoint into a callable handle. Stateless: no pooling, no
/// reuse across endpoints or invocations.
#[tonic::async_trait]
pub trait WorkerConnector: Send + Sync {
    async fn connect(&self, endpoint: &Endpoint) -> anyhow::Result<Box<dyn WorkerHandle>>;
}
