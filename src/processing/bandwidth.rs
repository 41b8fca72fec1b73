//! Circuit bandwidth cell parsing (`"100/20M"`, `"80_20"`, `"50M"`, `"EoFTTP ..."`).

use crate::config::{EOFTTP_DOWNSTREAM_MBPS, EOFTTP_MARKER};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").expect("Invalid Regex?");
}

/// Shaping rates in kbit/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bandwidth {
    pub downstream_kbps: u64,
    pub upstream_kbps: u64,
}

/// Megabit figure from one side of the cell: text before the first `M`,
/// digits only.
fn side_mbps(side: &str) -> Option<u64> {
    let before_unit = side.split('M').next().unwrap_or_default();
    let digits = NON_DIGIT.replace_all(before_unit, "");
    digits.parse().ok()
}

/// Parse a tracker bandwidth cell into kbit/s.
///
/// A single figure is used for both directions. EoFTTP products always get
/// [`EOFTTP_DOWNSTREAM_MBPS`] downstream whatever the cell says.
pub fn parse_bandwidth(raw: &str) -> Result<Bandwidth, String> {
    let (down, up) = if let Some((down, up)) = split_pair(raw, '/') {
        (down, up)
    } else if let Some((down, up)) = split_pair(raw, '_') {
        (down, up)
    } else {
        (raw, raw)
    };

    let downstream = if raw.contains(EOFTTP_MARKER) {
        Some(EOFTTP_DOWNSTREAM_MBPS)
    } else {
        side_mbps(down)
    };
    let upstream = side_mbps(up);

    let kbps = |mbps: Option<u64>| mbps.and_then(|m| m.checked_mul(1000));
    match (kbps(downstream), kbps(upstream)) {
        (Some(downstream_kbps), Some(upstream_kbps)) => Ok(Bandwidth {
            downstream_kbps,
            upstream_kbps,
        }),
        _ => Err(format!("no usable bandwidth figure in '{raw}'")),
    }
}

/// First two fields around `sep`, if present.
fn split_pair(raw: &str, sep: char) -> Option<(&str, &str)> {
    let mut parts = raw.split(sep);
    let first = parts.next()?;
    let second = parts.next()?;
    Some((first, second))
}
