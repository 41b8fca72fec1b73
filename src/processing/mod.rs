//! Tracker row processing.
//!
//! This module contains the business logic turning sheet rows into records:
//! - [`normalize`] - one row to a [`crate::models::DeviceRecord`] or a skip
//! - [`batch`] - fold of all rows into an [`ImportBatch`]
//! - [`bandwidth`] and [`hostname`] - cell parsers

mod bandwidth;
mod batch;
mod hostname;
mod normalize;

// Re-export public functions
pub use bandwidth::{parse_bandwidth, Bandwidth};
pub use batch::{build_batch, ImportBatch, SkippedRow};
pub use hostname::{parse_hostname, SiteName};
pub use normalize::{
    is_mpls, normalize_vlan_tag, public_prefix_text, wan_interface_name, Normalizer, RowOutcome,
};
