//! strip-feed: serves local memory, CPU and disk metrics to `strip` over a
//! WebSocket.
//!
//! Run with:  `RUST_LOG=info strip-feed --pid 1234`

mod server;

use anyhow::{Context, Result};
use clap::Parser;
use std::{net::SocketAddr, time::Duration};
use strip_system::{spawn_monitor, Target};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "strip-feed", version, about = "WebSocket metric feed for strip")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8889")]
    bind: SocketAddr,

    /// Watch a single process instead of the whole system
    #[arg(long)]
    pid: Option<u32>,

    /// Milliseconds between samples
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let target = cli.pid.map_or(Target::System, Target::Process);

    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("cannot bind {}", cli.bind))?;
    info!(
        "strip-feed v{} listening on ws://{} ({target:?}, every {} ms)",
        env!("CARGO_PKG_VERSION"),
        cli.bind,
        cli.interval_ms,
    );

    let (clients, _) = broadcast::channel(server::FAN_OUT_CAPACITY);
    let samples = spawn_monitor(Duration::from_millis(cli.interval_ms), target);
    tokio::spawn(server::publish(samples, clients.clone()));

    server::serve(listener, clients).await.context("accept loop failed")
}
