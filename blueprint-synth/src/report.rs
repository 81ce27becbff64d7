//! Progress reporting
//!
//! The driver reports through a [`Reporter`] handed to it by the caller
//! instead of logging globally, so tests can observe (or ignore) what
//! happened without installing a subscriber.

use crate::inventory::MergeOutcome;
use std::path::Path;
use tracing::{debug, info};

pub trait Reporter {
    fn playbook_written(&self, path: &Path, tasks: usize);
    fn inventory_merged(&self, path: &Path, hostname: &str, outcome: MergeOutcome);
    fn notice(&self, message: &str);
}

/// Forwards every event to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn playbook_written(&self, path: &Path, tasks: usize) {
        info!("Wrote {} ({} tasks)", path.display(), tasks);
    }

    fn inventory_merged(&self, path: &Path, hostname: &str, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::AlreadyPresent => {
                info!("Inventory {} already lists {}, left unchanged", path.display(), hostname)
            }
            _ => info!("Inventory {} {} entry for {}", path.display(), outcome, hostname),
        }
    }

    fn notice(&self, message: &str) {
        debug!("{}", message);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn playbook_written(&self, _path: &Path, _tasks: usize) {}
    fn inventory_merged(&self, _path: &Path, _hostname: &str, _outcome: MergeOutcome) {}
    fn notice(&self, _message: &str) {}
}
