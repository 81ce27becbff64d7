//! Flat inventory file maintenance
//!
//! One host per line, `{hostname} ansible_host=... ansible_user=...
//! ansible_port=...`. The file only ever grows: a host judged present by the
//! configured [`HostMatcher`] is left alone, existing lines are never
//! rewritten.

use crate::config::MatchStrategy;
use crate::error::{Result, SynthError};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// One inventory line, keyed by hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub hostname: String,
    pub ansible_host: String,
    pub ansible_user: String,
    pub ansible_port: u16,
    pub private_key_file: Option<String>,
}

impl InventoryEntry {
    pub fn new(hostname: impl Into<String>, ansible_host: impl Into<String>, ansible_port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            ansible_host: ansible_host.into(),
            ansible_user: "root".to_string(),
            ansible_port,
            private_key_file: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.ansible_user = user.into();
        self
    }

    pub fn with_private_key_file(mut self, path: Option<String>) -> Self {
        self.private_key_file = path;
        self
    }
}

impl fmt::Display for InventoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ansible_host={} ansible_user={} ansible_port={}",
            self.hostname, self.ansible_host, self.ansible_user, self.ansible_port
        )?;
        if let Some(key) = &self.private_key_file {
            write!(f, " ansible_ssh_private_key_file={key}")?;
        }
        Ok(())
    }
}

/// Decides whether `hostname` already has an entry in the inventory text
pub trait HostMatcher {
    fn is_present(&self, inventory: &str, hostname: &str) -> bool;
}

/// Raw substring search.
///
/// Known defect kept for compatibility: `web1` counts as present when only
/// `web10` is listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl HostMatcher for SubstringMatch {
    fn is_present(&self, inventory: &str, hostname: &str) -> bool {
        inventory.contains(hostname)
    }
}

/// Hostname must equal the first field of a line
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactHostMatch;

impl HostMatcher for ExactHostMatch {
    fn is_present(&self, inventory: &str, hostname: &str) -> bool {
        inventory
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .any(|host| host == hostname)
    }
}

pub fn matcher_for(strategy: MatchStrategy) -> Box<dyn HostMatcher> {
    match strategy {
        MatchStrategy::Substring => Box::new(SubstringMatch),
        MatchStrategy::Exact => Box::new(ExactHostMatch),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Appended,
    AlreadyPresent,
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MergeOutcome::Created => "created",
            MergeOutcome::Appended => "appended",
            MergeOutcome::AlreadyPresent => "already present",
        };
        f.write_str(text)
    }
}

/// Add `entry` to the inventory at `path` unless its host is already listed
pub fn merge(path: &Path, entry: &InventoryEntry, matcher: &dyn HostMatcher) -> Result<MergeOutcome> {
    let write_err = |source| SynthError::Write { path: path.to_path_buf(), source };

    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            std::fs::write(path, entry.to_string()).map_err(write_err)?;
            return Ok(MergeOutcome::Created);
        }
        Err(source) => return Err(SynthError::Read { path: path.to_path_buf(), source }),
    };

    if matcher.is_present(&existing, &entry.hostname) {
        return Ok(MergeOutcome::AlreadyPresent);
    }

    let mut file = OpenOptions::new().append(true).open(path).map_err(write_err)?;
    write!(file, "\n{entry}").map_err(write_err)?;
    Ok(MergeOutcome::Appended)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web1() -> InventoryEntry {
        InventoryEntry::new("web1", "1.2.3.4", 22)
    }

    #[test]
    fn test_entry_line() {
        assert_eq!(web1().to_string(), "web1 ansible_host=1.2.3.4 ansible_user=root ansible_port=22");

        let entry = InventoryEntry::new("db", "10.0.0.9", 2222)
            .with_user("admin")
            .with_private_key_file(Some("/root/.ssh/id_ed25519".into()));
        assert_eq!(
            entry.to_string(),
            "db ansible_host=10.0.0.9 ansible_user=admin ansible_port=2222 ansible_ssh_private_key_file=/root/.ssh/id_ed25519"
        );
    }

    #[test]
    fn test_create_then_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory");

        assert_eq!(merge(&path, &web1(), &SubstringMatch).unwrap(), MergeOutcome::Created);
        let first = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, web1().to_string());

        assert_eq!(merge(&path, &web1(), &SubstringMatch).unwrap(), MergeOutcome::AlreadyPresent);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_substring_prefix_collision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory");
        std::fs::write(&path, "web1 ansible_host=1.2.3.4 ansible_user=root ansible_port=22").unwrap();

        let web10 = InventoryEntry::new("web10", "5.6.7.8", 22);
        assert_eq!(merge(&path, &web10, &SubstringMatch).unwrap(), MergeOutcome::Appended);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "web1 ansible_host=1.2.3.4 ansible_user=root ansible_port=22\nweb10 ansible_host=5.6.7.8 ansible_user=root ansible_port=22"
        );

        assert_eq!(merge(&path, &web1(), &SubstringMatch).unwrap(), MergeOutcome::AlreadyPresent);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_substring_false_positive_vs_exact() {
        let inventory = "web10 ansible_host=5.6.7.8 ansible_user=root ansible_port=22";
        assert!(SubstringMatch.is_present(inventory, "web1"));
        assert!(!ExactHostMatch.is_present(inventory, "web1"));
        assert!(ExactHostMatch.is_present(inventory, "web10"));
        assert!(!ExactHostMatch.is_present("", "web10"));
    }

    #[test]
    fn test_exact_strategy_appends_prefix_host() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory");
        std::fs::write(&path, "web10 ansible_host=5.6.7.8 ansible_user=root ansible_port=22").unwrap();

        let matcher = matcher_for(MatchStrategy::Exact);
        assert_eq!(merge(&path, &web1(), matcher.as_ref()).unwrap(), MergeOutcome::Appended);
        assert_eq!(merge(&path, &web1(), matcher.as_ref()).unwrap(), MergeOutcome::AlreadyPresent);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("inventory");
        assert!(matches!(merge(&path, &web1(), &SubstringMatch), Err(SynthError::Write { .. })));
    }
}
