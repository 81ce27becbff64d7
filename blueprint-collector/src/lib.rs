//! Blueprint collector - captures the state of a Debian-family server
//!
//! - Command execution behind the [`CommandRunner`] capability
//! - Package, service, network, ssh and crontab probes
//! - Inventory address discovery from local interfaces

pub mod collect;
pub mod discovery;
pub mod runner;

pub use collect::SnapshotCollector;
pub use runner::{CommandRunner, ExecutionError, ShellRunner};

use anyhow::{Context, Result};
use blueprint_synth::Snapshot;
use std::path::Path;

/// Write a snapshot as pretty JSON
pub async fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
