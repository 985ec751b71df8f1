// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out coordination: dispatch one request to every live worker and
//! aggregate the per-worker outcomes into one result.
//!
//! Fan-out is sequential: one worker is contacted and its response fully
//! processed before the next is contacted. Status ordering is therefore
//! trivially resolution order, and the first failure wins with nothing
//! left in flight. Membership is re-resolved on every call; nothing is
//! cached between invocations.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::discover::{resolve, Endpoint, Scope};
use crate::error::CoordError;
use crate::registry::WorkerRegistry;
use crate::worker::{CancelRequest, StatusReport, WorkerConnector, WorkerHandle};

/// Coordinates group operations over a pipeline's live workers.
pub struct Coordinator {
    registry: Box<dyn WorkerRegistry>,
    connector: Box<dyn WorkerConnector>,
    prefix: String,
}

impl Coordinator {
    pub fn new(
        registry: Box<dyn WorkerRegistry>,
        connector: Box<dyn WorkerConnector>,
        prefix: impl Into<String>,
    ) -> Self {
        Self { registry, connector, prefix: prefix.into() }
    }

    /// Query the status of every worker in `scope`.
    ///
    /// Fail-fast: the first connect or RPC failure aborts the whole
    /// operation and collected reports are discarded, so a successful
    /// return means every currently-registered worker answered. Reports
    /// are in resolution order. Zero workers yields an empty list, not
    /// an error.
    pub async fn query_status(
        &self,
        scope: &Scope,
        ctx: &CancellationToken,
    ) -> Result<Vec<StatusReport>, CoordError> {
        let endpoints = resolve(self.registry.as_ref(), &self.prefix, scope, ctx).await?;

        let mut reports = Vec::with_capacity(endpoints.len());
        for endpoint in &endpoints {
            let mut worker = self.connect(endpoint, ctx).await?;
            let result = tokio::select! {
                biased;
                _ = ctx.cancelled() => Err(CoordError::Cancelled),
                r = worker.get_status() => r.map_err(|e| CoordError::Rpc {
                    endpoint: endpoint.host.clone(),
                    source: e,
                }),
            };
            worker.close().await;
            reports.push(result?);
        }
        debug!(scope = %scope, reports = reports.len(), "status fan-out complete");
        Ok(reports)
    }

    /// Cancel in-flight datums matching `data_filters` for `job_id` across
    /// every worker in `scope`.
    ///
    /// Logical OR with fail-fast on transport errors: a worker that
    /// completes the call and reports no match keeps the loop going; any
    /// dial or RPC failure aborts immediately and surfaces as that error,
    /// never folded into "not found". When every contacted worker says no
    /// — including the zero-worker case — the result is
    /// [`CoordError::DatumNotFound`], distinguishing "we looked everywhere
    /// and found nothing" from "we could not finish looking".
    pub async fn cancel_datum(
        &self,
        scope: &Scope,
        job_id: &str,
        data_filters: &[String],
        ctx: &CancellationToken,
    ) -> Result<(), CoordError> {
        let endpoints = resolve(self.registry.as_ref(), &self.prefix, scope, ctx).await?;
        let request = CancelRequest {
            job_id: job_id.to_owned(),
            data_filters: data_filters.to_vec(),
        };

        let mut found = false;
        for endpoint in &endpoints {
            let mut worker = self.connect(endpoint, ctx).await?;
            let result = tokio::select! {
                biased;
                _ = ctx.cancelled() => Err(CoordError::Cancelled),
                r = worker.cancel_datum(&request) => r.map_err(|e| CoordError::Rpc {
                    endpoint: endpoint.host.clone(),
                    source: e,
                }),
            };
            worker.close().await;
            if result? {
                debug!(worker = %endpoint.host, job = job_id, "worker canceled matching datum");
                found = true;
            }
        }

        if found {
            Ok(())
        } else {
            Err(CoordError::DatumNotFound {
                job_id: job_id.to_owned(),
                data_filters: data_filters.to_vec(),
            })
        }
    }

    /// Dial one endpoint, racing the caller's cancellation context.
    async fn connect(
        &self,
        endpoint: &Endpoint,
        ctx: &CancellationToken,
    ) -> Result<Box<dyn WorkerHandle>, CoordError> {
        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(CoordError::Cancelled),
            r = self.connector.connect(endpoint) => r.map_err(|e| CoordError::Connect {
                endpoint: endpoint.host.clone(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
#[path = "fanout_tests.rs"]
mod tests;
