//! `blueprint-collect` - snapshot the local server to JSON

use anyhow::{Context, Result};
use blueprint_collector::{save_snapshot, ShellRunner, SnapshotCollector};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blueprint-collect", version, about = "Capture this server's configuration as a JSON snapshot")]
struct Cli {
    /// Output file (default: server_info_<timestamp>.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Per-command timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("server_info_{}.json", Local::now().format("%Y%m%d_%H%M%S"))));

    let collector = SnapshotCollector::new(ShellRunner::new(Duration::from_secs(cli.timeout)));
    let snapshot = collector.collect().await;

    save_snapshot(&snapshot, &output)
        .await
        .context("Failed to save server snapshot")?;

    info!("Server information saved to {}", output.display());
    println!("{}", output.display());
    Ok(())
}
