//! Domain models for the vManage import.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] - IPv4 address with CIDR notation support
//! - [`DeviceRecord`] - one normalised router/site from the tracker sheet
//! - [`GeoResult`] - postcode coordinates
//! - [`NextHopOverrides`] - WAN gateway direction exceptions

mod device;
mod geo;
mod ipv4;
mod route;

// Re-export public types
pub use device::{DeviceRecord, InterfaceSpec, ProvisioningBlock, VlanId, PROVISIONING_SWITCH_PORTS};
pub use geo::GeoResult;
pub use ipv4::{get_cidr_mask, offset_addr, Ipv4, MAX_LENGTH};
pub use route::{HopDirection, NextHopOverrides};
