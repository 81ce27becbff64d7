//! Subsystem playbook generators
//!
//! Each generator is a pure function of the snapshot and configuration. The
//! tasks they emit assert a target state (package present, service started,
//! file contents, cron entry) so the resulting playbooks can be applied
//! repeatedly.

use super::{PlaybookDocument, Subsystem, Task};
use crate::config::SynthConfig;
use crate::crontab::CrontabParser;
use crate::extract;
use crate::snapshot::Snapshot;

const SSH_OWNER: &str = "root";
const SSH_MODE: &str = "0644";

/// Dispatch to the generator for `subsystem`
pub fn generate(subsystem: Subsystem, snapshot: &Snapshot, config: &SynthConfig) -> PlaybookDocument {
    match subsystem {
        Subsystem::Packages => generate_packages(snapshot, config),
        Subsystem::Services => generate_services(snapshot),
        Subsystem::Network => generate_network(snapshot),
        Subsystem::Ssh => generate_ssh(snapshot, config),
        Subsystem::Crontab => generate_crontab(snapshot, config),
    }
}

/// One apt task installing every package, in snapshot order
pub fn generate_packages(snapshot: &Snapshot, config: &SynthConfig) -> PlaybookDocument {
    let packages = extract::package_names(snapshot);
    if packages.is_empty() {
        return PlaybookDocument::default();
    }

    PlaybookDocument::new(vec![Task::new("Install required packages", "apt")
        .param("name", packages)
        .param("state", "present")
        .param("update_cache", config.packages.update_cache)])
}

pub fn generate_services(snapshot: &Snapshot) -> PlaybookDocument {
    let services = extract::service_names(snapshot);
    if services.is_empty() {
        return PlaybookDocument::default();
    }

    PlaybookDocument::new(vec![Task::new("Ensure services are running", "service")
        .param("name", "{{ item }}")
        .param("state", "started")
        .looping(services)])
}

/// Network changes are left to an operator; only report what was captured
pub fn generate_network(snapshot: &Snapshot) -> PlaybookDocument {
    let msg = format!("Current network configuration: {}", extract::ip_addr(snapshot));

    PlaybookDocument::new(vec![
        Task::new("Display network configuration (for manual intervention)", "debug").param("msg", msg),
    ])
}

/// Write sshd_config, then restart the daemon.
///
/// Ansible stops a host at the first failed task, so a failed write never
/// reaches the restart.
pub fn generate_ssh(snapshot: &Snapshot, config: &SynthConfig) -> PlaybookDocument {
    let settings = extract::ssh_settings(snapshot, config.ssh.default_port);
    if settings.is_empty() {
        return PlaybookDocument::default();
    }

    PlaybookDocument::new(vec![
        Task::new("Configure SSH", "copy")
            .param("content", settings.content())
            .param("dest", config.ssh.dest.as_str())
            .param("owner", SSH_OWNER)
            .param("group", SSH_OWNER)
            .param("mode", SSH_MODE),
        Task::new("Restart SSH service", "service")
            .param("name", config.ssh.service_name.as_str())
            .param("state", "restarted"),
    ])
}

/// One cron task per parsed entry.
///
/// The cron module's `name` doubles as its idempotency key, so it is set to
/// the same indexed label as the task.
pub fn generate_crontab(snapshot: &Snapshot, config: &SynthConfig) -> PlaybookDocument {
    let user = config.crontab.user.as_str();
    let parser = CrontabParser::new(config.crontab.skip_comments);

    let tasks = extract::cron_entries(snapshot, user, &parser)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let label = cron_label(user, i + 1);
            Task::new(label.as_str(), "cron")
                .param("name", label)
                .param("user", user)
                .param("minute", entry.minute)
                .param("hour", entry.hour)
                .param("day", entry.day)
                .param("month", entry.month)
                .param("weekday", entry.weekday)
                .param("job", entry.command)
        })
        .collect();

    PlaybookDocument::new(tasks)
}

fn cron_label(user: &str, index: usize) -> String {
    if user == "root" {
        format!("Root crontab entry {index}")
    } else {
        format!("{user} crontab entry {index}")
    }
}
