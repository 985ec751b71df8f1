// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tonic-backed worker connector.

use crate::discover::Endpoint;
use crate::worker::proto::worker_client::WorkerClient;
use crate::worker::{
    proto, CancelRequest, StatusReport, WorkerConnector, WorkerHandle, WORKER_RPC_PORT,
};

/// Dials workers over plaintext gRPC.
///
/// Plaintext is deliberate: workers and coordinator share a trusted
/// network, and the port is not a security boundary.
#[derive(Debug, Clone)]
pub struct GrpcConnector {
    port: u16,
}

impl GrpcConnector {
    /// Connector dialing the fixed worker port.
    pub fn new() -> Self {
        Self { port: WORKER_RPC_PORT }
    }

    /// Override the dial port. For embedding and test harnesses only;
    /// production workers always serve on [`WORKER_RPC_PORT`].
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }
}

impl Default for GrpcConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[tonic::async_trait]
impl WorkerConnector for GrpcConnector {
    async fn connect(&self, endpoint: &Endpoint) -> anyhow::Result<Box<dyn WorkerHandle>> {
        let uri = format!("http://{}:{}", endpoint.host, self.port);
        let channel = tonic::transport::Channel::from_shared(uri)?.connect().await?;
        Ok(Box::new(GrpcWorker { client: WorkerClient::new(channel) }))
    }
}

struct GrpcWorker {
    client: WorkerClient<tonic::transport::Channel>,
}

#[tonic::async_trait]
impl WorkerHandle for GrpcWorker {
    async fn get_status(&mut self) -> anyhow::Result<StatusReport> {
        let response = self.client.get_status(proto::GetStatusRequest {}).await?;
        Ok(response.into_inner())
    }

    async fn cancel_datum(&mut self, request: &CancelRequest) -> anyhow::Result<bool> {
        let response = self
            .client
            .cancel_datum(proto::CancelDatumRequest {
                job_id: request.job_id.clone(),
                data_filters: request.data_filters.clone(),
            })
            .await?;
        Ok(response.into_inner().success)
    }

    async fn close(self: Box<Self>) {
        // Dropping the client drops the channel, which tears down the
        // HTTP/2 connection.
        drop(self);
    }
}
