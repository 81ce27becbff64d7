//! Network interface discovery
//!
//! Picks the address the inventory should use to reach this host:
//! - loopback and IPv6 addresses are skipped
//! - Ethernet-named interfaces win over wireless, wireless over the rest
//! - enumeration order breaks ties

use if_addrs::get_if_addrs;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, info, warn};

/// Interface type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InterfaceType {
    Ethernet,
    Wireless,
    Other,
    Loopback,
}

/// An IPv4 address bound to a named interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub name: String,
    pub ip: Ipv4Addr,
}

/// Classify interface type based on name patterns
pub fn classify_interface(name: &str) -> InterfaceType {
    let name_lower = name.to_lowercase();

    if name_lower == "lo" || name_lower.starts_with("lo:") || name_lower.starts_with("loopback") {
        return InterfaceType::Loopback;
    }

    if name_lower.starts_with("wlan") || name_lower.starts_with("wlp") || name_lower.starts_with("wlo") || name_lower.contains("wifi") {
        return InterfaceType::Wireless;
    }

    // en* covers ens/enp/eno
    if name_lower.starts_with("eth") || name_lower.starts_with("en") {
        return InterfaceType::Ethernet;
    }

    InterfaceType::Other
}

/// Select the primary address based on interface priority
pub fn select_primary(addrs: &[InterfaceAddr]) -> Option<&InterfaceAddr> {
    let chosen = addrs
        .iter()
        .filter(|a| !a.ip.is_loopback())
        .map(|a| (classify_interface(&a.name), a))
        .filter(|(kind, _)| *kind != InterfaceType::Loopback)
        .min_by_key(|(kind, _)| *kind)
        .map(|(_, a)| a);

    match chosen {
        Some(addr) => debug!("Selected {} on {} as primary address", addr.ip, addr.name),
        None => warn!("No usable IPv4 interface among {} candidates", addrs.len()),
    }
    chosen
}

/// Enumerate local IPv4 addresses
pub fn local_addrs() -> std::io::Result<Vec<InterfaceAddr>> {
    let addrs = get_if_addrs()?
        .into_iter()
        .filter_map(|iface| match iface.ip() {
            IpAddr::V4(ip) => Some(InterfaceAddr { name: iface.name, ip }),
            IpAddr::V6(_) => None,
        })
        .collect();
    Ok(addrs)
}

/// Address for the inventory entry, `None` if nothing routable was found
pub fn discover_public_ip() -> Option<Ipv4Addr> {
    let addrs = match local_addrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            warn!("Failed to enumerate network interfaces: {}", e);
            return None;
        }
    };

    let ip = select_primary(&addrs).map(|a| a.ip);
    if let Some(ip) = ip {
        info!("Discovered public address {}", ip);
    }
    ip
}
