//! vManage import CSV.
//!
//! Column keys are the controller's template variable paths and must not be
//! renamed.

use crate::config::DEFAULT_ROUTE_PREFIX;
use crate::error::ImportError;
use crate::models::{DeviceRecord, GeoResult, VlanId};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const IMPORT_COLUMNS: [&str; 24] = [
    "csv-deviceId",
    "csv-deviceIP",
    "csv-host-name",
    "/0/interface_and_tag/interface/if-name",
    "/0/interface_and_tag/interface/ip/address",
    "/0/vpn-instance/ip/route/vpn0_default_route/prefix",
    "/0/vpn-instance/ip/route/vpn0_default_route/next-hop/vpn0_next_hop/address",
    "//system/host-name",
    "//system/system-ip",
    "//system/site-id",
    "//system/gps-location/latitude",
    "//system/gps-location/longitude",
    "/500/Loopback0/interface/ip/address",
    "/100/Vlan5/interface/ip/address",
    "/100/Vlan10/interface/ip/address",
    "/100/Vlan218/interface/ip/address",
    "/0/interface_and_tag/interface/description",
    "/0/interface_and_tag/interface/shaping-rate",
    "/0/interface_and_tag/interface/bandwidth-downstream",
    "/500/Vlan3901/interface/ip/address",
    "/500/Vlan3901//dhcp-server/address-pool",
    "/500/Vlan3901//dhcp-server/options/default-gateway",
    "//switchport/interface/GigabitEthernet0/1/4/shutdown",
    "//switchport/interface/GigabitEthernet0/1/5/shutdown",
];

/// Rows ready to write, one per accepted device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportTable {
    pub rows: Vec<Vec<String>>,
}

/// Unresolved coordinates are left empty.
fn coordinate(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => v.to_string(),
        _ => String::new(),
    }
}

fn vlan_cell(record: &DeviceRecord, vlan: VlanId) -> String {
    record
        .vlan(vlan)
        .map(|ip| ip.to_string())
        .unwrap_or_default()
}

/// Render records (and their coordinates, by position) as table rows.
pub fn build_table(records: &[DeviceRecord], geo: &[GeoResult]) -> ImportTable {
    let rows = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let location = geo.get(i);
            let mut row = vec![
                r.device_id.clone(),
                r.device_ip.to_string(),
                r.hostname.clone(),
                r.wan.name.clone(),
                r.wan.address.to_string(),
                DEFAULT_ROUTE_PREFIX.to_string(),
                r.next_hop.to_string(),
                r.hostname.clone(),
                r.device_ip.to_string(),
                r.site_id.clone(),
                coordinate(location.map(|g| g.latitude)),
                coordinate(location.map(|g| g.longitude)),
                r.loopback.to_string(),
                vlan_cell(r, VlanId::Vlan5),
                vlan_cell(r, VlanId::Vlan10),
                vlan_cell(r, VlanId::Vlan218),
                r.wan.description.clone(),
                r.wan.upstream_kbps.to_string(),
                r.wan.downstream_kbps.to_string(),
                r.provisioning.router.to_string(),
                r.provisioning.dhcp_pool.clone(),
                r.provisioning.gateway.to_string(),
            ];
            // Provisioning switch ports are always enabled
            row.extend(r.switch_ports().iter().map(|_| "FALSE".to_string()));
            row
        })
        .collect();
    ImportTable { rows }
}

/// Write header + rows as CSV to any writer.
pub fn write_table<W: Write>(writer: W, table: &ImportTable) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(IMPORT_COLUMNS)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the import file. Goes through a temporary file so a failure never
/// leaves a partial import behind.
pub fn write_import_csv(path: &Path, table: &ImportTable) -> Result<(), ImportError> {
    let output_error = |message: String| ImportError::Output {
        path: path.display().to_string(),
        message,
    };
    // Temp file sits beside the target so the final rename stays on one filesystem.
    // It is removed on drop if any step fails.
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| output_error(e.to_string()))?;
    write_table(&mut tmp, table).map_err(|e| output_error(e.to_string()))?;
    tmp.persist(path).map_err(|e| output_error(e.error.to_string()))?;
    log::info!("Wrote {} rows to {}", table.rows.len(), path.display());
    Ok(())
}
