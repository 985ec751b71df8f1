// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use pipectl::config::{Command, Config};
use pipectl::discover::Scope;
use pipectl::error::CoordError;
use pipectl::fanout::Coordinator;
use pipectl::registry::nats::NatsRegistry;
use pipectl::worker::grpc::GrpcConnector;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    init_tracing(&config);

    match run(config).await {
        Ok(()) => {}
        Err(e) => {
            error!("fatal: {e:#}");
            let code = e.downcast_ref::<CoordError>().map(CoordError::exit_code).unwrap_or(1);
            std::process::exit(code);
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).init();
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let ctx = CancellationToken::new();

    // SIGINT/SIGTERM cancel the in-flight invocation via the token, so
    // outstanding dials and RPCs abort promptly.
    spawn_signal_handler(ctx.clone());

    // The overall timeout rides the same token as signals.
    {
        let ctx = ctx.clone();
        let timeout = config.registry.timeout();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            ctx.cancel();
        });
    }

    // The store connection rides the token too: a stalled handshake must
    // respect --timeout-ms and signals, not async-nats's own timeout.
    let registry = tokio::select! {
        biased;
        _ = ctx.cancelled() => return Err(CoordError::Cancelled.into()),
        r = NatsRegistry::connect(&config.registry.nats_url, &config.registry.bucket) => {
            r.map_err(CoordError::Discovery)?
        }
    };
    let coordinator = Coordinator::new(
        Box::new(registry),
        Box::new(GrpcConnector::new()),
        config.registry.prefix.clone(),
    );

    match config.command {
        Command::Status { pipeline } => {
            let scope = Scope::from_pipeline(pipeline);
            let reports = coordinator.query_status(&scope, &ctx).await?;
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
            info!(scope = %scope, workers = reports.len(), "status query complete");
        }
        Command::Cancel { pipeline, job, filters } => {
            let scope = Scope::from_pipeline(pipeline);
            coordinator.cancel_datum(&scope, &job, &filters, &ctx).await?;
            println!("canceled datums matching {filters:?} for job {job}");
        }
    }

    Ok(())
}

fn spawn_signal_handler(ctx: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).ok();

        tokio::select! {
            _ = async {
                if let Some(ref mut s) = sigterm { s.recv().await } else { std::future::pending().await }
            } => {
                info!("received SIGTERM");
                ctx.cancel();
            }
            _ = async {
                if let Some(ref mut s) = sigint { s.recv().await } else { std::future::pending().await }
            } => {
                info!("received SIGINT");
                ctx.cancel();
            }
        }
    });
}
