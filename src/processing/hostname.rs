//! Router hostname clean-up and site/postcode extraction.
//!
//! Hostnames follow `<prefix>-<site_type>-<site_ref>-<postcode>-R1`.

use crate::config::ROLE_SUFFIX;
use crate::error::SkipReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteName {
    pub hostname: String,
    pub site_id: String,
    pub postcode: String,
}

/// Repair and split a hostname cell. Whitespace is removed and a missing
/// role suffix appended, each with a log notice naming the row.
pub fn parse_hostname(raw: &str, row: usize) -> Result<SiteName, SkipReason> {
    let mut hostname: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if hostname != raw {
        log::warn!("row {row}: removed whitespace from hostname '{raw}' -> '{hostname}'");
    }
    if hostname.is_empty() {
        return Err(SkipReason::NoHostname);
    }

    // Segments are counted without the role suffix so it can never stand in for the postcode.
    let base = hostname.strip_suffix(ROLE_SUFFIX).unwrap_or(&hostname);
    let segments: Vec<&str> = base.split('-').collect();
    if segments.len() < 4 || segments[..4].iter().any(|s| s.is_empty()) {
        return Err(SkipReason::BadHostname(hostname));
    }
    let site_id = format!("{}{}", segments[1], segments[2]);
    let postcode = segments[3].to_string();

    if !hostname.ends_with(ROLE_SUFFIX) {
        let corrected = format!("{hostname}{ROLE_SUFFIX}");
        log::warn!("row {row}: hostname '{hostname}' missing role suffix, using '{corrected}'");
        hostname = corrected;
    }

    Ok(SiteName {
        hostname,
        site_id,
        postcode,
    })
}
