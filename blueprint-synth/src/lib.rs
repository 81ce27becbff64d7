//! Blueprint synthesis engine
//!
//! Turns a server snapshot into ansible playbooks that reproduce it:
//! - Field extraction and normalization per subsystem
//! - Crontab and sshd_config parsing
//! - Structured playbook documents rendered to YAML in one step
//! - Append-only inventory maintenance with a pluggable host matcher

pub mod config;
pub mod crontab;
pub mod driver;
pub mod error;
pub mod extract;
pub mod inventory;
pub mod playbook;
pub mod report;
pub mod snapshot;

pub use config::{MatchStrategy, SynthConfig};
pub use crontab::{parse_crontab, CronEntry, CrontabParser};
pub use driver::{render_all, run, synthesize, Summary};
pub use error::{Result, SynthError};
pub use inventory::{merge, ExactHostMatch, HostMatcher, InventoryEntry, MergeOutcome, SubstringMatch};
pub use playbook::{PlaybookDocument, Subsystem, Task};
pub use report::{NullReporter, Reporter, TracingReporter};
pub use snapshot::Snapshot;
