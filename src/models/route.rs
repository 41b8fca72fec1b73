//! Next-hop direction rules for WAN circuits.
//!
//! The WAN default gateway normally sits one address below the router's WAN
//! address. MPLS circuits and a handful of carrier anomalies put it one above;
//! the anomalies are kept as data in [`NextHopOverrides`].

use super::Ipv4;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Which side of the WAN address the gateway sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopDirection {
    Up,
    Down,
}

impl HopDirection {
    pub fn delta(self) -> i64 {
        match self {
            HopDirection::Up => 1,
            HopDirection::Down => -1,
        }
    }
}

impl fmt::Display for HopDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HopDirection::Up => write!(f, "up"),
            HopDirection::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for HopDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "+1" => Ok(HopDirection::Up),
            "down" | "-1" => Ok(HopDirection::Down),
            other => Err(format!("unknown next-hop direction '{other}'")),
        }
    }
}

/// Known circuits whose gateway does not follow the default rule.
/// Keyed by the WAN interface exactly as normalised (address + prefix length).
const BUILTIN_OVERRIDES: &[(&str, HopDirection)] = &[("31.119.4.50/31", HopDirection::Up)];

/// Lookup table of WAN interface -> next-hop direction.
#[derive(Debug, Clone, Default)]
pub struct NextHopOverrides {
    table: HashMap<Ipv4, HopDirection>,
}

impl NextHopOverrides {
    /// Table holding the built-in carrier anomalies.
    pub fn builtin() -> Self {
        let mut overrides = NextHopOverrides::default();
        for (cidr, direction) in BUILTIN_OVERRIDES {
            if let Ok(wan) = Ipv4::new(cidr) {
                overrides.insert(wan, *direction);
            }
        }
        overrides
    }

    pub fn insert(&mut self, wan: Ipv4, direction: HopDirection) {
        self.table.insert(wan, direction);
    }

    /// Merge `cidr=up|down` pairs separated by commas, e.g.
    /// `"31.119.4.50/31=up,81.2.69.10/31=down"`.
    pub fn merge_spec(&mut self, spec: &str) -> Result<(), Box<dyn Error>> {
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (cidr, direction) = pair
                .split_once('=')
                .ok_or_else(|| format!("next-hop override '{pair}' is not cidr=direction"))?;
            let wan = Ipv4::new(cidr)?;
            let direction: HopDirection = direction.parse()?;
            log::debug!("next-hop override {wan} -> {direction}");
            self.insert(wan, direction);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Direction for a WAN interface: MPLS first, then the table, else down.
    pub fn direction_for(&self, wan: &Ipv4, mpls: bool) -> HopDirection {
        if mpls {
            return HopDirection::Up;
        }
        self.table.get(wan).copied().unwrap_or(HopDirection::Down)
    }
}
