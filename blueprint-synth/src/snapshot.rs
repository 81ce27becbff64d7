//! Server snapshot model
//!
//! The JSON document produced by `blueprint-collect` (or any tool emitting the
//! same shape). Only a handful of fields feed synthesis:
//! - `hostname`, `public_ip` for the inventory entry and index file name
//! - `installed_packages`, `services`, `network`, `ssh_config`, `crontab`
//!   for the subsystem playbooks
//!
//! Every field is optional on input. The remaining collector fields are
//! carried through untouched so a snapshot survives a load/save cycle.

use crate::error::{Result, SynthError};
use crate::playbook::Subsystem;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const UNKNOWN: &str = "unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Empty or null identity fields read as [`UNKNOWN`], like absent ones
fn or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(unknown))
}

/// Point-in-time state of one server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "unknown", deserialize_with = "or_unknown")]
    pub hostname: String,
    #[serde(default = "unknown", deserialize_with = "or_unknown")]
    pub public_ip: String,
    #[serde(default)]
    pub ssh_config: String,
    /// Raw crontab text keyed by user name
    #[serde(default)]
    pub crontab: BTreeMap<String, String>,
    #[serde(default)]
    pub installed_packages: Vec<Package>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub network: NetworkSnapshot,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users_and_groups: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_rules: Option<String>,
    /// Anything else the collector put in the document
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            hostname: unknown(),
            public_ip: unknown(),
            ssh_config: String::new(),
            crontab: BTreeMap::new(),
            installed_packages: Vec::new(),
            services: Vec::new(),
            network: NetworkSnapshot::default(),
            timestamp: None,
            os_version: None,
            kernel_version: None,
            users_and_groups: BTreeMap::new(),
            firewall_rules: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Snapshot {
    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SynthError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SynthError::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File stem used for the index playbook.
    ///
    /// The hostname becomes `{hostname}.yml` next to the subsystem playbooks,
    /// so anything that could escape the output directory is rejected, and so
    /// is a name whose index would overwrite a subsystem playbook.
    pub fn playbook_stem(&self) -> Result<&str> {
        let name = self.hostname.as_str();
        let index_file = format!("{name}.yml");
        let bad = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
            || name.contains('\0')
            || Subsystem::ALL
                .iter()
                .any(|s| s.file_name().eq_ignore_ascii_case(&index_file));

        if bad {
            return Err(SynthError::InvalidHostname(name.to_string()));
        }
        Ok(name)
    }
}
