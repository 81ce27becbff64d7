use blueprint_synth::{MergeOutcome, Reporter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    PlaybookWritten { path: PathBuf, tasks: usize },
    InventoryMerged { path: PathBuf, hostname: String, outcome: MergeOutcome },
    Notice(String),
}

/// Reporter that keeps every event for later assertions
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }

    /// File names of written playbooks, in write order
    pub fn written_files(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::PlaybookWritten { path, .. } => {
                    path.file_name().map(|name| name.to_string_lossy().into_owned())
                }
                _ => None,
            })
            .collect()
    }

    pub fn merge_outcomes(&self) -> Vec<MergeOutcome> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::InventoryMerged { outcome, .. } => Some(outcome),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Notice(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn playbook_written(&self, path: &Path, tasks: usize) {
        self.push(ReportEvent::PlaybookWritten { path: path.to_path_buf(), tasks });
    }

    fn inventory_merged(&self, path: &Path, hostname: &str, outcome: MergeOutcome) {
        self.push(ReportEvent::InventoryMerged {
            path: path.to_path_buf(),
            hostname: hostname.to_string(),
            outcome,
        });
    }

    fn notice(&self, message: &str) {
        self.push(ReportEvent::Notice(message.to_string()));
    }
}
