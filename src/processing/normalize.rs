//! Tracker row -> [`DeviceRecord`].
//!
//! Rules run in a fixed order and the first failing rule decides the outcome:
//! row-scoped problems become [`RowOutcome::Skipped`], broken VLAN networks
//! become a run-fatal [`ImportError::MalformedSubnet`].

use super::bandwidth::{parse_bandwidth, Bandwidth};
use super::hostname::parse_hostname;
use crate::config::{
    DEFAULT_LOOPBACK_PREFIX_LEN, DEFAULT_PUBLIC_PREFIX_LEN, DEFAULT_WAN_PREFIX_LEN,
    MPLS_PLACEHOLDER_PREFIX, WAN_PARENT_INTERFACE,
};
use crate::error::{ImportError, SkipReason};
use crate::models::{
    offset_addr, DeviceRecord, InterfaceSpec, Ipv4, NextHopOverrides, ProvisioningBlock, VlanId,
};
use crate::tracker::{Column, Row};
use std::collections::BTreeMap;
use std::error::Error;

/// Result of normalising one row that did not abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(Box<DeviceRecord>),
    Skipped(SkipReason),
}

pub struct Normalizer<'a> {
    overrides: &'a NextHopOverrides,
}

/// Whether the circuit type cell names an MPLS circuit.
pub fn is_mpls(circuit_type: Option<&str>) -> bool {
    circuit_type
        .map(|c| c.to_lowercase().contains("mpls"))
        .unwrap_or(false)
}

/// VLAN tag cell: lowercased, `"none"` when empty.
pub fn normalize_vlan_tag(raw: Option<&str>) -> String {
    let tag = raw.unwrap_or_default().trim().to_lowercase();
    if tag.is_empty() {
        "none".to_string()
    } else {
        tag
    }
}

pub fn wan_interface_name(tag: &str) -> String {
    if tag == "none" {
        WAN_PARENT_INTERFACE.to_string()
    } else {
        format!("{WAN_PARENT_INTERFACE}.{tag}")
    }
}

/// Public /29 text with a prefix length, or the MPLS placeholder.
pub fn public_prefix_text(raw: Option<&str>, mpls: bool) -> Option<String> {
    match raw {
        Some(text) if text.contains('/') => Some(text.to_string()),
        Some(text) => Some(format!("{text}/{DEFAULT_PUBLIC_PREFIX_LEN}")),
        None if mpls => Some(MPLS_PLACEHOLDER_PREFIX.to_string()),
        None => None,
    }
}

/// Router address for a VLAN network: first usable host, same prefix length.
/// The cell must hold a network; anything else is run-fatal.
fn vlan_router(row: &Row, column: Column) -> Result<Ipv4, ImportError> {
    let value = row.cell(column);
    let malformed = |reason: String| ImportError::MalformedSubnet {
        row: row.number,
        column: column.label(),
        value: value.unwrap_or_default().to_string(),
        reason,
    };
    let text = value.ok_or_else(|| malformed("cell is empty".to_string()))?;
    let network = Ipv4::network(text).map_err(|e| malformed(e.to_string()))?;
    network.first_host().map_err(|e| malformed(e.to_string()))
}

/// Provisioning block from the public /29 text. Host bits are cleared.
fn provisioning_block(text: &str) -> Result<ProvisioningBlock, Box<dyn Error>> {
    let network = Ipv4::with_default_mask(text, DEFAULT_PUBLIC_PREFIX_LEN)?.to_network();
    let router = network.first_host()?;
    Ok(ProvisioningBlock::new(network, router))
}

macro_rules! skip {
    ($reason:expr) => {
        return Ok(RowOutcome::Skipped($reason))
    };
}

impl<'a> Normalizer<'a> {
    pub fn new(overrides: &'a NextHopOverrides) -> Self {
        Normalizer { overrides }
    }

    pub fn normalize(&self, row: &Row) -> Result<RowOutcome, ImportError> {
        let n = row.number;

        let Some(wan_cell) = row.cell(Column::WanIp) else {
            skip!(SkipReason::NoCircuit)
        };
        let Some(serial) = row.cell(Column::Serial) else {
            skip!(SkipReason::NoSerial)
        };
        let Some(model) = row.cell(Column::Model) else {
            skip!(SkipReason::NoModel)
        };
        let device_id = format!("{model}-{serial}");
        log::info!("Row :{n}  device {device_id}");

        let mpls = is_mpls(row.cell(Column::CircuitType));

        // Public /29: a bad value only drops it from route aggregation.
        let public_text = public_prefix_text(row.cell(Column::PublicPrefix), mpls);
        let public_prefix = match public_text.as_deref().map(Ipv4::network) {
            Some(Ok(prefix)) => Some(prefix),
            Some(Err(e)) => {
                log::warn!(
                    "row {n}: public prefix '{}' excluded from route list: {e}",
                    public_text.as_deref().unwrap_or_default()
                );
                None
            }
            None => None,
        };

        let Some(loopback_cell) = row.cell(Column::Loopback) else {
            log::error!("row {n}: {device_id} has NO loopback/system IP, row not imported");
            skip!(SkipReason::NoLoopback)
        };
        let loopback = match Ipv4::with_default_mask(loopback_cell, DEFAULT_LOOPBACK_PREFIX_LEN) {
            Ok(ip) => ip,
            Err(_) => skip!(SkipReason::BadLoopback(loopback_cell.to_string())),
        };
        if !loopback_cell.contains('/') {
            log::info!("row {n}: loopback {loopback_cell} has no prefix length, using {loopback}");
        }

        let wan_address = match Ipv4::with_default_mask(wan_cell, DEFAULT_WAN_PREFIX_LEN) {
            Ok(ip) => ip,
            Err(_) => skip!(SkipReason::BadWanAddress(wan_cell.to_string())),
        };
        if !wan_cell.contains('/') {
            log::info!("row {n}: WAN IP {wan_cell} has no prefix length, using {wan_address}");
        }
        let direction = self.overrides.direction_for(&wan_address, mpls);
        let next_hop = match offset_addr(wan_address.addr, direction.delta()) {
            Ok(addr) => addr,
            Err(_) => skip!(SkipReason::BadWanAddress(wan_cell.to_string())),
        };
        log::debug!("row {n}: WAN {wan_address} next hop {next_hop} ({direction})");

        let tag = normalize_vlan_tag(row.cell(Column::VlanTag));
        let wan_name = wan_interface_name(&tag);

        let site = match parse_hostname(row.cell(Column::Hostname).unwrap_or_default(), n) {
            Ok(site) => site,
            Err(reason) => skip!(reason),
        };

        let bandwidth_cell = row.cell(Column::Bandwidth).unwrap_or_default();
        let bandwidth = parse_bandwidth(bandwidth_cell).unwrap_or_else(|e| {
            log::warn!("row {n}: {e}, shaping rates set to 0");
            Bandwidth::default()
        });

        let mut vlan_subnets = BTreeMap::new();
        for (vlan, column) in [
            (VlanId::Vlan5, Column::Vlan5),
            (VlanId::Vlan10, Column::Vlan10),
            (VlanId::Vlan218, Column::Vlan218),
        ] {
            vlan_subnets.insert(vlan, vlan_router(row, column)?);
        }

        // Public /29 doubles as the VLAN 3901 provisioning network.
        let Some(public_cell) = public_text.as_deref() else {
            log::error!("row {n}: {device_id} has no public /29 for provisioning, row not imported");
            skip!(SkipReason::NoPublicPrefix)
        };
        let provisioning = match provisioning_block(public_cell) {
            Ok(block) => block,
            Err(e) => {
                log::error!("row {n}: public /29 '{public_cell}' unusable for provisioning: {e}");
                skip!(SkipReason::BadPublicPrefix(public_cell.to_string()))
            }
        };

        Ok(RowOutcome::Accepted(Box::new(DeviceRecord {
            row: n,
            device_id,
            device_ip: loopback.addr,
            hostname: site.hostname,
            site_id: site.site_id,
            postcode: site.postcode,
            mpls,
            wan: InterfaceSpec {
                name: wan_name,
                address: wan_address,
                description: row
                    .cell(Column::WanDescription)
                    .unwrap_or_default()
                    .to_string(),
                downstream_kbps: bandwidth.downstream_kbps,
                upstream_kbps: bandwidth.upstream_kbps,
                tag,
            },
            next_hop,
            loopback,
            vlan_subnets,
            provisioning,
            public_prefix,
        })))
    }
}
