//! Normalised device/site record built from one tracker row.

use super::Ipv4;
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

/// Switch ports opened for zero-touch provisioning on every router.
pub const PROVISIONING_SWITCH_PORTS: [&str; 2] =
    ["GigabitEthernet0/1/4", "GigabitEthernet0/1/5"];

/// The LAN VLANs carried on every site router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VlanId {
    Vlan5,
    Vlan10,
    Vlan218,
}

impl VlanId {
    pub const ALL: [VlanId; 3] = [VlanId::Vlan5, VlanId::Vlan10, VlanId::Vlan218];

    pub fn id(self) -> u16 {
        match self {
            VlanId::Vlan5 => 5,
            VlanId::Vlan10 => 10,
            VlanId::Vlan218 => 218,
        }
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VLAN{}", self.id())
    }
}

/// WAN uplink settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSpec {
    /// `GigabitEthernet0/0/0` or `GigabitEthernet0/0/0.<tag>`.
    pub name: String,
    pub address: Ipv4,
    pub description: String,
    pub downstream_kbps: u64,
    pub upstream_kbps: u64,
    /// Lowercased VLAN tag, `"none"` when untagged.
    pub tag: String,
}

/// Bootstrap network (VLAN 3901) for zero-touch provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningBlock {
    pub network: Ipv4,
    /// First usable host, with the network's prefix length.
    pub router: Ipv4,
    pub dhcp_pool: String,
    pub gateway: Ipv4Addr,
}

impl ProvisioningBlock {
    pub fn new(network: Ipv4, router: Ipv4) -> Self {
        ProvisioningBlock {
            dhcp_pool: network.to_string(),
            gateway: router.addr,
            network,
            router,
        }
    }
}

/// One router to be onboarded. Every field is populated; rows that cannot
/// fill one are skipped before a record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// 1-based sheet row the record came from.
    pub row: usize,
    /// `"{model}-{serial}"`.
    pub device_id: String,
    pub device_ip: Ipv4Addr,
    pub hostname: String,
    pub site_id: String,
    pub postcode: String,
    pub mpls: bool,
    pub wan: InterfaceSpec,
    pub next_hop: Ipv4Addr,
    pub loopback: Ipv4,
    pub vlan_subnets: BTreeMap<VlanId, Ipv4>,
    pub provisioning: ProvisioningBlock,
    /// Customer-routable block for route aggregation; not part of the import table.
    pub public_prefix: Option<Ipv4>,
}

impl DeviceRecord {
    pub fn switch_ports(&self) -> &'static [&'static str] {
        &PROVISIONING_SWITCH_PORTS
    }

    pub fn vlan(&self, vlan: VlanId) -> Option<&Ipv4> {
        self.vlan_subnets.get(&vlan)
    }
}
