//! Playbook document model
//!
//! Generators build [`PlaybookDocument`] values out of [`Task`] records and a
//! single serialization step turns them into ansible YAML. Values coming from
//! the snapshot (package names, cron commands, sshd text) only ever land in
//! scalar positions, so the serializer takes care of quoting and escaping.
//!
//! serde_yaml follows YAML 1.2 and leaves `yes`, `on`, `n` and friends plain.
//! Ansible reads YAML 1.1, where those are booleans, so rendered text goes
//! through [`quote_yaml11_booleans`] before it is returned.

pub mod generators;
pub mod index;

pub use generators::{
    generate, generate_crontab, generate_network, generate_packages, generate_services, generate_ssh,
};
pub use index::IndexDocument;

use crate::error::Result;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

const DOCUMENT_START: &str = "---\n";

/// Plain scalars YAML 1.1 resolves to booleans
const YAML11_BOOLEANS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off", "OFF",
];

fn plain_scalar_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(?P<lead>\s*(?:- )*(?:[^\s'"-][^:]*: )?)(?P<value>[^\s'"]+)$"#)
            .expect("plain scalar pattern is valid")
    })
}

fn literal_block_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)\|[0-9+-]*$").expect("block header pattern is valid"))
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Single-quote plain scalars that a YAML 1.1 reader would take as booleans.
///
/// Lines inside literal blocks are content, not scalars, and pass through.
pub fn quote_yaml11_booleans(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len());
    let mut block_indent: Option<usize> = None;

    for line in rendered.split_inclusive('\n') {
        let text = line.strip_suffix('\n').unwrap_or(line);

        if let Some(indent) = block_indent {
            if text.trim().is_empty() || indentation(text) > indent {
                out.push_str(line);
                continue;
            }
            block_indent = None;
        }

        if literal_block_header().is_match(text) {
            block_indent = Some(indentation(text));
            out.push_str(line);
            continue;
        }

        match plain_scalar_line().captures(text) {
            Some(caps) if YAML11_BOOLEANS.contains(&&caps["value"]) => {
                out.push_str(&caps["lead"]);
                out.push('\'');
                out.push_str(&caps["value"]);
                out.push('\'');
                out.push_str(&line[text.len()..]);
            }
            _ => out.push_str(line),
        }
    }
    out
}

/// The subsystem playbooks, in the order the index imports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Packages,
    Services,
    Network,
    Ssh,
    Crontab,
}

impl Subsystem {
    pub const ALL: [Subsystem; 5] = [
        Subsystem::Packages,
        Subsystem::Services,
        Subsystem::Network,
        Subsystem::Ssh,
        Subsystem::Crontab,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Subsystem::Packages => "packages",
            Subsystem::Services => "services",
            Subsystem::Network => "network",
            Subsystem::Ssh => "ssh",
            Subsystem::Crontab => "crontab",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.yml", self.name())
    }
}

/// One task: a display name, the module invoked and its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: String,
    pub module: String,
    pub params: Mapping,
    /// Items for ansible's `loop`, referenced as `{{ item }}` in params
    pub loop_items: Option<Vec<String>>,
}

impl Task {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            params: Mapping::new(),
            loop_items: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(Value::from(key), value.into());
        self
    }

    pub fn looping(mut self, items: Vec<String>) -> Self {
        self.loop_items = Some(items);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// String parameter, `None` when absent or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.loop_items.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry(&self.module, &self.params)?;
        if let Some(items) = &self.loop_items {
            map.serialize_entry("loop", items)?;
        }
        map.end()
    }
}

/// A single-play playbook targeting every inventory host
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybookDocument {
    pub hosts: String,
    pub become_root: bool,
    pub tasks: Vec<Task>,
}

impl Default for PlaybookDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PlaybookDocument {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            hosts: "all".to_string(),
            become_root: true,
            tasks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Serialize to ansible YAML
    pub fn render(&self) -> Result<String> {
        let body = serde_yaml::to_string(&[Play(self)])?;
        Ok(format!("{DOCUMENT_START}{}", quote_yaml11_booleans(&body)))
    }
}

struct Play<'a>(&'a PlaybookDocument);

impl Serialize for Play<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("hosts", &self.0.hosts)?;
        map.serialize_entry("become", &self.0.become_root)?;
        map.serialize_entry("tasks", &self.0.tasks)?;
        map.end()
    }
}
