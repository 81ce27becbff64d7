/*!
Scratch workspace for end-to-end synthesis tests

Owns a temporary directory, writes snapshot files into it and hands out a
configuration whose output directory lives inside it.
*/

use anyhow::Result;
use blueprint_synth::{Snapshot, SynthConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestWorkspace {
    dir: TempDir,
    pub config: SynthConfig,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let mut config = SynthConfig::default();
        config.output.dir = dir.path().join("playbooks");
        Ok(Self { dir, config })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output.dir
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.output_dir().join("inventory")
    }

    /// Serialize `snapshot` to `name` inside the workspace
    pub fn write_snapshot(&self, name: &str, snapshot: &Snapshot) -> Result<PathBuf> {
        self.write_raw(name, &serde_json::to_string_pretty(snapshot)?)
    }

    pub fn write_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read_output(&self, file_name: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.output_dir().join(file_name))?)
    }

    pub fn output_exists(&self, file_name: &str) -> bool {
        self.output_dir().join(file_name).exists()
    }
}
