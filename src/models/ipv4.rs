//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Ipv4`] struct for representing IPv4 interfaces and networks,
//! along with the address arithmetic the tracker normalisation needs
//! (network address, first usable host, next-hop offsets).

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use sdwan_import::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        Ok(mask_bits(len))
    }
}

fn mask_bits(len: u8) -> u32 {
    let right_len = MAX_LENGTH - len.min(MAX_LENGTH);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Move an address up or down by `delta`, independent of any prefix length.
///
/// Fails instead of wrapping around the ends of the address space.
pub fn offset_addr(addr: Ipv4Addr, delta: i64) -> Result<Ipv4Addr, Box<dyn Error>> {
    let shifted = i64::from(u32::from(addr)) + delta;
    let bits = u32::try_from(shifted)
        .map_err(|_| format!("Address {addr} offset by {delta} leaves the IPv4 range"))?;
    Ok(Ipv4Addr::from(bits))
}

/// IPv4 address with CIDR notation support.
///
/// Used both as an interface (`addr` may have host bits set) and as a
/// network (see [`Ipv4::network`]).
#[derive(Eq, Ord, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let cidr = format!("{}/{}", self.addr, self.mask);
        serializer.serialize_str(&cidr)
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(format!("Invalid address/mask '{addr_cidr}'").into());
        }
        let addr: Ipv4Addr = parts[0]
            .trim()
            .parse()
            .map_err(|_| format!("Invalid address {}", parts[0]))?;
        let mask: u8 = parts[1]
            .trim()
            .parse()
            .map_err(|_| format!("Invalid mask {}", parts[1]))?;
        get_cidr_mask(mask)?;
        Ok(Ipv4 { addr, mask })
    }

    /// Parse `addr[/len]`, appending `/default_len` when no prefix length is given.
    pub fn with_default_mask(text: &str, default_len: u8) -> Result<Ipv4, Box<dyn Error>> {
        let text = text.trim();
        if text.contains('/') {
            Ipv4::new(text)
        } else {
            Ipv4::new(&format!("{text}/{default_len}"))
        }
    }

    /// Parse a network in CIDR notation, rejecting host bits.
    pub fn network(text: &str) -> Result<Ipv4, Box<dyn Error>> {
        let net = Ipv4::new(text)?;
        if !net.is_network() {
            return Err(format!("{net} has host bits set").into());
        }
        Ok(net)
    }

    /// True when `addr` is the network address for `mask`.
    pub fn is_network(&self) -> bool {
        self.addr == self.lo()
    }

    /// The containing network (host bits cleared).
    pub fn to_network(&self) -> Ipv4 {
        Ipv4 {
            addr: self.lo(),
            mask: self.mask,
        }
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) | !mask_bits(self.mask))
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & mask_bits(self.mask))
    }

    /// Whether `ip` falls inside this subnet.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.lo() <= ip && ip <= self.hi()
    }

    /// First usable host (network address + 1), keeping this prefix length.
    ///
    /// A /32 has no such address.
    pub fn first_host(&self) -> Result<Ipv4, Box<dyn Error>> {
        let first = offset_addr(self.lo(), 1)?;
        if !self.contains(first) {
            return Err(format!("{} has no usable host address", self.to_network()).into());
        }
        Ok(Ipv4 {
            addr: first,
            mask: self.mask,
        })
    }
}

impl FromStr for Ipv4 {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4::new(s)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl PartialEq for Ipv4 {
    fn eq(&self, other: &Ipv4) -> bool {
        self.addr == other.addr && self.mask == other.mask
    }
}

impl PartialOrd for Ipv4 {
    fn partial_cmp(&self, other: &Ipv4) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
