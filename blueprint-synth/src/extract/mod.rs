//! Field extractors
//!
//! Pure functions pulling one subsystem's data out of a [`Snapshot`] in the
//! shape its playbook generator consumes. Missing data always comes back empty
//! rather than as an error.

pub mod ssh;

pub use ssh::{extract_port, SshSettings, DEFAULT_SSH_PORT};

use crate::crontab::{CronEntry, CrontabParser};
use crate::snapshot::Snapshot;

pub const NETWORK_PLACEHOLDER: &str = "N/A";

/// Package names in snapshot order
pub fn package_names(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .installed_packages
        .iter()
        .map(|pkg| pkg.name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names of every recorded service, in snapshot order.
///
/// The recorded state is not consulted: the collector only lists units that
/// were running, and a oneshot unit seen as `exited` is still started.
pub fn service_names(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .services
        .iter()
        .map(|svc| svc.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Current address summary for the diagnostic network task
pub fn ip_addr(snapshot: &Snapshot) -> String {
    snapshot
        .network
        .ip_addr
        .as_deref()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(NETWORK_PLACEHOLDER)
        .to_string()
}

pub fn ssh_settings(snapshot: &Snapshot, default_port: u16) -> SshSettings {
    SshSettings::with_default_port(&snapshot.ssh_config, default_port)
}

/// Raw crontab text for `user`, empty when the user has none
pub fn crontab_text<'a>(snapshot: &'a Snapshot, user: &str) -> &'a str {
    snapshot.crontab.get(user).map(String::as_str).unwrap_or("")
}

pub fn cron_entries(snapshot: &Snapshot, user: &str, parser: &CrontabParser) -> Vec<CronEntry> {
    parser.parse(crontab_text(snapshot, user))
}
