//! Block-storage CSI plugin entry point.
//!
//! Bootstraps the driver: merges the configuration files given on the
//! command line, brings up the optional metrics endpoint, eagerly probes
//! the backend provider, and then waits for shutdown. A metrics listener
//! failure is fatal; an unavailable backend is logged and surfaced to the
//! RPC layer per request instead.

use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blockstorage_csi::{DriverError, ProviderContext};

#[derive(Parser)]
#[command(name = "blockstorage-csi-plugin")]
#[command(about = "Block-storage CSI plugin - backend bootstrap and metrics")]
#[command(version)]
struct Cli {
    /// Configuration file; repeatable, later files override earlier ones
    #[arg(long = "config", required = true)]
    config: Vec<PathBuf>,

    /// Address to serve prometheus metrics on (e.g. 0.0.0.0:9808)
    #[arg(long, env = "METRICS_HTTP_ENDPOINT")]
    http_endpoint: Option<String>,

    /// Namespace prefix for exported metrics
    #[arg(long, default_value = "blockstorage_csi")]
    metrics_namespace: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cli = Cli::parse();

    let (fatal_tx, mut fatal_rx) = mpsc::channel::<DriverError>(1);
    let (context, _metrics) = ProviderContext::init(
        cli.config,
        &cli.metrics_namespace,
        cli.http_endpoint,
        fatal_tx,
    )?;

    match context.get_provider().await {
        Ok(provider) => tracing::info!(
            compute = provider.compute().endpoint(),
            blockstorage = provider.block_storage().endpoint(),
            portal = provider.portal().endpoint(),
            "backend provider ready"
        ),
        Err(err) => tracing::error!(error = %err, "backend provider unavailable"),
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested");
            Ok(())
        }
        Some(err) = fatal_rx.recv() => {
            tracing::error!(error = %err, "fatal bootstrap error, exiting");
            Err(err.into())
        }
    }
}
