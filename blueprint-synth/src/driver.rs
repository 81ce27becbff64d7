//! Run orchestration: snapshot in, playbooks and inventory out
//!
//! Everything is rendered in memory before the first file is touched, so a
//! bad snapshot never leaves partial output behind. Writing itself is not
//! transactional: an I/O failure halfway leaves the files written so far.

use crate::config::SynthConfig;
use crate::error::{Result, SynthError};
use crate::extract;
use crate::inventory::{self, InventoryEntry, MergeOutcome};
use crate::playbook::{self, IndexDocument, Subsystem};
use crate::report::Reporter;
use crate::snapshot::Snapshot;
use std::path::{Path, PathBuf};

pub const INVENTORY_FILE: &str = "inventory";

/// A rendered document waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub file_name: String,
    pub content: String,
    pub tasks: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub tasks: usize,
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct Summary {
    pub hostname: String,
    pub output_dir: PathBuf,
    pub files: Vec<GeneratedFile>,
    pub index: PathBuf,
    pub inventory: PathBuf,
    pub inventory_outcome: MergeOutcome,
    pub inventory_entry: String,
}

impl Summary {
    /// Command that applies the generated playbooks to the new host
    pub fn follow_on_command(&self) -> String {
        format!("ansible-playbook -i {} {}", self.inventory.display(), self.index.display())
    }
}

/// Render the five subsystem documents and the index, in import order
pub fn render_all(snapshot: &Snapshot, config: &SynthConfig) -> Result<Vec<RenderedFile>> {
    let stem = snapshot.playbook_stem()?;
    let mut files = Vec::with_capacity(Subsystem::ALL.len() + 1);

    for subsystem in Subsystem::ALL {
        let doc = playbook::generate(subsystem, snapshot, config);
        files.push(RenderedFile {
            file_name: subsystem.file_name(),
            content: doc.render()?,
            tasks: doc.tasks.len(),
        });
    }

    files.push(RenderedFile {
        file_name: format!("{stem}.yml"),
        content: IndexDocument::default().render()?,
        tasks: 0,
    });

    Ok(files)
}

pub fn inventory_entry(snapshot: &Snapshot, config: &SynthConfig) -> InventoryEntry {
    let port = extract::ssh_settings(snapshot, config.ssh.default_port).port;
    InventoryEntry::new(snapshot.hostname.as_str(), snapshot.public_ip.as_str(), port)
        .with_user(config.inventory.user.as_str())
        .with_private_key_file(config.inventory.private_key_file.clone())
}

/// Write every playbook for `snapshot` and merge its inventory entry
pub fn synthesize(snapshot: &Snapshot, config: &SynthConfig, reporter: &dyn Reporter) -> Result<Summary> {
    let rendered = render_all(snapshot, config)?;
    let output_dir = config.output.dir.clone();

    std::fs::create_dir_all(&output_dir).map_err(|source| SynthError::Write {
        path: output_dir.clone(),
        source,
    })?;

    let mut files = Vec::with_capacity(rendered.len());
    for file in rendered {
        let path = output_dir.join(&file.file_name);
        std::fs::write(&path, &file.content).map_err(|source| SynthError::Write {
            path: path.clone(),
            source,
        })?;
        reporter.playbook_written(&path, file.tasks);
        files.push(GeneratedFile { path, tasks: file.tasks });
    }

    // render_all pushes the index last
    let index = files
        .last()
        .map(|f| f.path.clone())
        .unwrap_or_else(|| output_dir.join(format!("{}.yml", snapshot.hostname)));

    let ssh = extract::ssh_settings(snapshot, config.ssh.default_port);
    if !ssh.is_empty() {
        reporter.notice(&format!(
            "sshd_config for {} (port {}):\n{}",
            snapshot.hostname,
            ssh.port,
            ssh.indented(4)
        ));
    }

    let entry = inventory_entry(snapshot, config);
    let inventory_path = output_dir.join(INVENTORY_FILE);
    let matcher = inventory::matcher_for(config.inventory.match_strategy);
    let outcome = inventory::merge(&inventory_path, &entry, matcher.as_ref())?;
    reporter.inventory_merged(&inventory_path, &entry.hostname, outcome);

    Ok(Summary {
        hostname: snapshot.hostname.clone(),
        output_dir,
        files,
        index,
        inventory: inventory_path,
        inventory_outcome: outcome,
        inventory_entry: entry.to_string(),
    })
}

/// Load the snapshot at `path` and synthesize it
pub fn run(path: &Path, config: &SynthConfig, reporter: &dyn Reporter) -> Result<Summary> {
    let snapshot = Snapshot::load(path)?;
    reporter.notice(&format!("Loaded snapshot for {} from {}", snapshot.hostname, path.display()));
    synthesize(&snapshot, config, reporter)
}
