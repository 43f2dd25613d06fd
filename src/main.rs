//! strip: a real-time strip chart for memory, CPU and disk I/O.
//!
//! Run with:  `RUST_LOG=info strip --url ws://127.0.0.1:8889`

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "strip", version, about = "Real-time strip chart for streamed metrics")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/strip/strip.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// WebSocket URL of the sample source, overriding `[source] url`
    #[arg(long)]
    url: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("strip v{} starting", env!("CARGO_PKG_VERSION"));

    strip_app::run(cli.config, cli.url).map_err(Into::into)
}
