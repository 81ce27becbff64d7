//! `blueprint` - generate playbooks from a server snapshot

use anyhow::{Context, Result};
use blueprint_synth::{MatchStrategy, SynthConfig, TracingReporter};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blueprint", version, about = "Generate ansible playbooks from a server snapshot")]
struct Cli {
    /// Snapshot JSON produced by blueprint-collect
    snapshot: PathBuf,

    /// Directory receiving the playbooks and inventory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How to detect an existing inventory entry: substring or exact
    #[arg(long)]
    match_strategy: Option<MatchStrategy>,

    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = SynthConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if let Some(strategy) = cli.match_strategy {
        config.inventory.match_strategy = strategy;
    }

    info!("Synthesizing playbooks from {}", cli.snapshot.display());
    let summary = blueprint_synth::run(&cli.snapshot, &config, &TracingReporter)
        .with_context(|| format!("Failed to synthesize playbooks from {}", cli.snapshot.display()))?;

    println!("Playbooks for {} generated in {}:", summary.hostname, summary.output_dir.display());
    for file in &summary.files {
        println!("  {} ({} tasks)", file.path.display(), file.tasks);
    }
    println!("Inventory {}: {}", summary.inventory.display(), summary.inventory_outcome);
    println!();
    println!("To apply these playbooks, run:");
    println!("{}", summary.follow_on_command());

    Ok(())
}
