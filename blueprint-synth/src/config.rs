//! Synthesis configuration
//!
//! Handles:
//! - Output directory for the generated playbooks
//! - Inventory line settings and the host matching strategy
//! - SSH destination path and service name
//! - Crontab user selection
//!
//! Lookup order: explicit `--config` file, then
//! `{config_dir}/blueprint/config.toml`, then built-in defaults.

use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub output: OutputConfig,
    pub inventory: InventoryConfig,
    pub ssh: SshConfig,
    pub packages: PackagesConfig,
    pub crontab: CrontabConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub user: String,
    pub private_key_file: Option<String>,
    pub match_strategy: MatchStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub dest: String,
    pub service_name: String,
    pub default_port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    pub update_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrontabConfig {
    pub user: String,
    pub skip_comments: bool,
}

/// How the inventory merger decides a host is already listed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Hostname appears anywhere in the file (`web1` matches `web10`)
    #[default]
    Substring,
    /// Hostname equals the first field of some line
    Exact,
}

impl FromStr for MatchStrategy {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "substring" => Ok(Self::Substring),
            "exact" => Ok(Self::Exact),
            other => Err(SynthError::Config(format!("unknown match strategy: {other}"))),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("playbooks") }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            private_key_file: None,
            match_strategy: MatchStrategy::Substring,
        }
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            dest: "/etc/ssh/sshd_config".to_string(),
            service_name: "sshd".to_string(),
            default_port: 22,
        }
    }
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self { update_cache: true }
    }
}

impl Default for CrontabConfig {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            skip_comments: false,
        }
    }
}

impl SynthConfig {
    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicitly requested file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::config_file_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SynthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| SynthError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// OS-specific default config file location
    pub fn config_file_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("blueprint");
        path.push("config.toml");
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SynthConfig::default();
        assert_eq!(config.output.dir, PathBuf::from("playbooks"));
        assert_eq!(config.inventory.user, "root");
        assert_eq!(config.inventory.match_strategy, MatchStrategy::Substring);
        assert_eq!(config.ssh.default_port, 22);
        assert!(config.packages.update_cache);
        assert_eq!(config.crontab.user, "root");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SynthConfig::from_toml_str(
            r#"
            [inventory]
            match_strategy = "exact"
            private_key_file = "/root/.ssh/id_ed25519"

            [ssh]
            service_name = "ssh"
            "#,
        )
        .unwrap();

        assert_eq!(config.inventory.match_strategy, MatchStrategy::Exact);
        assert_eq!(config.inventory.user, "root");
        assert_eq!(config.inventory.private_key_file.as_deref(), Some("/root/.ssh/id_ed25519"));
        assert_eq!(config.ssh.service_name, "ssh");
        assert_eq!(config.ssh.dest, "/etc/ssh/sshd_config");
        assert_eq!(config.output.dir, PathBuf::from("playbooks"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(SynthConfig::from_toml_str("[inventory]\nmatch_strategy = \"fuzzy\"").is_err());
        assert!("fuzzy".parse::<MatchStrategy>().is_err());
        assert_eq!("exact".parse::<MatchStrategy>().unwrap(), MatchStrategy::Exact);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SynthConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, SynthError::Read { .. }));
    }

    #[test]
    fn test_config_file_path() {
        if let Some(path) = SynthConfig::config_file_path() {
            assert!(path.to_string_lossy().contains("blueprint"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
