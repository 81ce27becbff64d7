//! Snapshot collection
//!
//! Each probe runs one or two commands through the [`CommandRunner`] and
//! parses the output. A failing probe is logged and contributes an empty
//! value; collection as a whole only fails if the snapshot cannot be built
//! at all.

use crate::discovery;
use crate::runner::CommandRunner;
use blueprint_synth::snapshot::{NetworkSnapshot, Package, Service, Snapshot, UNKNOWN};
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const DPKG_QUERY: &str = "dpkg-query -W -f='${Package}\\t${Version}\\n'";
pub const RUNNING_SERVICES: &str = "systemctl list-units --type=service --state=running --no-pager --no-legend";
pub const USER_NAMES: &str = "cut -d: -f1 /etc/passwd";

/// Source for the inventory address; swapped out in tests
pub type PublicIpProbe = fn() -> Option<std::net::Ipv4Addr>;

pub struct SnapshotCollector<R: CommandRunner> {
    runner: R,
    public_ip: PublicIpProbe,
}

impl<R: CommandRunner> SnapshotCollector<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            public_ip: discovery::discover_public_ip,
        }
    }

    pub fn with_public_ip_probe(mut self, probe: PublicIpProbe) -> Self {
        self.public_ip = probe;
        self
    }

    /// Collect complete server state
    pub async fn collect(&self) -> Snapshot {
        info!("Starting server state collection...");

        let hostname = self.probe("hostname", "hostname").await;
        let hostname = if hostname.is_empty() { UNKNOWN.to_string() } else { hostname };

        let snapshot = Snapshot {
            hostname,
            public_ip: (self.public_ip)().map(|ip| ip.to_string()).unwrap_or_else(|| UNKNOWN.to_string()),
            ssh_config: self.probe("ssh config", "cat /etc/ssh/sshd_config").await,
            crontab: self.crontabs().await,
            installed_packages: parse_dpkg(&self.probe("installed packages", DPKG_QUERY).await),
            services: parse_running_services(&self.probe("services", RUNNING_SERVICES).await),
            network: self.network().await,
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            os_version: self.optional("os version", "cat /etc/os-release").await,
            kernel_version: self.optional("kernel version", "uname -r").await,
            users_and_groups: self.users_and_groups().await,
            firewall_rules: self.optional("firewall rules", "iptables-save").await,
            extra: BTreeMap::new(),
        };

        info!(
            "Collection complete - Hostname: {}, {} packages, {} services, {} crontabs",
            snapshot.hostname,
            snapshot.installed_packages.len(),
            snapshot.services.len(),
            snapshot.crontab.len()
        );
        snapshot
    }

    /// Run one probe, degrading to an empty string on failure
    async fn probe(&self, what: &str, command: &str) -> String {
        debug!("Retrieving {}", what);
        match self.runner.run(command).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Error retrieving {}: {}", what, e);
                String::new()
            }
        }
    }

    async fn optional(&self, what: &str, command: &str) -> Option<String> {
        let output = self.probe(what, command).await;
        (!output.is_empty()).then_some(output)
    }

    async fn network(&self) -> NetworkSnapshot {
        let resolv = self.probe("resolver config", "cat /etc/resolv.conf").await;
        let dns: Vec<_> = resolv
            .lines()
            .filter(|line| line.trim_start().starts_with("nameserver"))
            .collect();

        NetworkSnapshot {
            ip_addr: self.optional("addresses", "ip -brief addr show").await,
            routing_table: self.optional("routing table", "ip route show").await,
            dns_servers: (!dns.is_empty()).then(|| dns.join("\n")),
            extra: BTreeMap::new(),
        }
    }

    async fn users_and_groups(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for (key, command) in [("users", "cut -d: -f1,3 /etc/passwd"), ("groups", "cut -d: -f1,3 /etc/group")] {
            let output = self.probe(key, command).await;
            if !output.is_empty() {
                map.insert(key.to_string(), output);
            }
        }
        map
    }

    async fn crontabs(&self) -> BTreeMap<String, String> {
        let users = self.probe("user list", USER_NAMES).await;
        let mut crontabs = BTreeMap::new();

        for user in users.lines().map(str::trim).filter(|u| !u.is_empty()) {
            // Users without a crontab make `crontab -l` exit non-zero
            let command = format!("crontab -l -u {user} 2>/dev/null");
            match self.runner.run(&command).await {
                Ok(text) if !text.is_empty() => {
                    debug!("Found crontab for {}", user);
                    crontabs.insert(user.to_string(), text);
                }
                Ok(_) => {}
                Err(e) => debug!("No crontab for {}: {}", user, e),
            }
        }
        crontabs
    }
}

/// `name\tversion` lines from dpkg-query
pub fn parse_dpkg(output: &str) -> Vec<Package> {
    output
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, version)| Package {
            name: name.trim().to_string(),
            version: Some(version.trim().to_string()).filter(|v| !v.is_empty()),
        })
        .collect()
}

/// First column of `systemctl list-units`, skipping the `●` marker on failed units
pub fn parse_running_services(output: &str) -> Vec<Service> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().find(|token| *token != "●" && *token != "*"))
        .map(|name| Service {
            name: name.to_string(),
            state: Some("running".to_string()),
        })
        .collect()
}
