//! Snapshot fixtures

use blueprint_synth::snapshot::{Package, Service, Snapshot};

pub const SAMPLE_SSHD_CONFIG: &str = "\
# This is the sshd server system-wide configuration file.
Include /etc/ssh/sshd_config.d/*.conf

Port 2222
#AddressFamily any
PermitRootLogin prohibit-password
PasswordAuthentication no

Subsystem sftp /usr/lib/openssh/sftp-server
";

pub const SAMPLE_CRONTAB: &str = "\
0 2 * * * /usr/bin/backup.sh
badline
30 3 * * 1 /usr/bin/report.sh --weekly > /var/log/report.log 2>&1
";

/// Fluent builder for snapshots used across tests
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new(hostname: &str) -> Self {
        Self {
            snapshot: Snapshot { hostname: hostname.to_string(), ..Snapshot::default() },
        }
    }

    pub fn public_ip(mut self, ip: &str) -> Self {
        self.snapshot.public_ip = ip.to_string();
        self
    }

    pub fn package(mut self, name: &str) -> Self {
        self.snapshot.installed_packages.push(Package { name: name.to_string(), version: None });
        self
    }

    pub fn packages(self, names: &[&str]) -> Self {
        names.iter().fold(self, |builder, name| builder.package(name))
    }

    pub fn service(mut self, name: &str, state: &str) -> Self {
        self.snapshot.services.push(Service {
            name: name.to_string(),
            state: Some(state.to_string()),
        });
        self
    }

    pub fn ip_addr(mut self, ip_addr: &str) -> Self {
        self.snapshot.network.ip_addr = Some(ip_addr.to_string());
        self
    }

    pub fn ssh_config(mut self, text: &str) -> Self {
        self.snapshot.ssh_config = text.to_string();
        self
    }

    pub fn crontab(mut self, user: &str, text: &str) -> Self {
        self.snapshot.crontab.insert(user.to_string(), text.to_string());
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot).unwrap_or_default()
    }
}

/// A fully populated web server snapshot
pub fn sample_snapshot() -> Snapshot {
    SnapshotBuilder::new("web1")
        .public_ip("1.2.3.4")
        .packages(&["nginx", "curl", "openssh-server"])
        .service("cron.service", "running")
        .service("nginx.service", "running")
        .service("ssh.service", "running")
        .ip_addr("eth0 UP 10.0.0.5/24")
        .ssh_config(SAMPLE_SSHD_CONFIG)
        .crontab("root", SAMPLE_CRONTAB)
        .build()
}
