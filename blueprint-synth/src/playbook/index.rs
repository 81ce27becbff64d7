use super::{Subsystem, DOCUMENT_START};
use crate::error::Result;
use serde::Serialize;

/// Top-level playbook importing the subsystem playbooks by relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    pub imports: Vec<String>,
}

#[derive(Serialize)]
struct Import<'a> {
    import_playbook: &'a str,
}

impl Default for IndexDocument {
    fn default() -> Self {
        Self {
            imports: Subsystem::ALL.iter().map(|s| s.file_name()).collect(),
        }
    }
}

impl IndexDocument {
    pub fn render(&self) -> Result<String> {
        let imports: Vec<_> = self
            .imports
            .iter()
            .map(|path| Import { import_playbook: path })
            .collect();
        let body = serde_yaml::to_string(&imports)?;
        Ok(format!("{DOCUMENT_START}{body}"))
    }
}
