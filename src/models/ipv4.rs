//! IPv4 address math and CIDR notation utilities.
//!
//! Addresses are plain `u32` values, most significant octet first. Text is
//! only parsed at the edges; everything inside works on the integer form.
//! Provides the [`Cidr`] block type used to name subnets in messages and
//! command input.

use crate::error::{CidrError, Result};
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::OnceLock;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// IPv4 address as an unsigned 32-bit integer.
pub type Address = u32;

/// Four octets 0-255, no leading zeros ("0" allowed, "01" rejected).
static ADDRESS_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_address_regex() -> &'static Regex {
    ADDRESS_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$",
        )
        .expect("Invalid Regex")
    })
}

/// Parse canonical dotted-decimal text into an [`Address`].
///
/// # Examples
/// ```
/// use cidr_flow::models::parse_address;
/// assert_eq!(parse_address("192.168.1.0").unwrap(), 0xC0A80100);
/// assert!(parse_address("192.168.01.0").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<Address> {
    if !get_address_regex().is_match(text) {
        return Err(CidrError::InvalidFormat(text.to_string()));
    }
    let addr = text
        .split('.')
        .map(u8::from_str)
        .try_fold(0u32, |acc, octet| octet.map(|o| (acc << 8) | u32::from(o)))
        .map_err(|_| CidrError::InvalidFormat(text.to_string()))?;
    Ok(addr)
}

/// Format an [`Address`] as canonical dotted-decimal text.
pub fn format_address(addr: Address) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// True iff `n` is a valid prefix length (0-32).
pub fn validate_prefix_length(n: i64) -> bool {
    (0..=i64::from(MAX_LENGTH)).contains(&n)
}

/// Parse prefix length text such as `"24"` or `"/24"`.
///
/// Only plain decimal digits after at most one `/`; no sign, no whitespace.
pub fn parse_prefix_length(text: &str) -> Result<u8> {
    let digits = text.strip_prefix('/').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CidrError::InvalidPrefixLength(text.to_string()));
    }
    match digits.parse::<i64>() {
        Ok(n) if validate_prefix_length(n) => Ok(n as u8),
        _ => Err(CidrError::InvalidPrefixLength(text.to_string())),
    }
}

fn check_prefix(len: u8) -> Result<()> {
    if len > MAX_LENGTH {
        Err(CidrError::InvalidPrefixLength(len.to_string()))
    } else {
        Ok(())
    }
}

/// Convert a CIDR prefix length to a subnet mask.
///
/// A 32-bit shift by 32 is not defined, so /0 is handled on its own.
///
/// # Examples
/// ```
/// use cidr_flow::models::mask_for;
/// assert_eq!(mask_for(24).unwrap(), 0xFFFFFF00);
/// assert_eq!(mask_for(0).unwrap(), 0);
/// ```
pub fn mask_for(len: u8) -> Result<Address> {
    check_prefix(len)?;
    if len == 0 {
        Ok(0)
    } else {
        Ok(u32::MAX << (MAX_LENGTH - len))
    }
}

/// Get the network address for a given address and prefix length.
pub fn network_address_of(addr: Address, len: u8) -> Result<Address> {
    Ok(addr & mask_for(len)?)
}

/// Calculate the broadcast address of a network.
pub fn broadcast_address_of(network: Address, len: u8) -> Result<Address> {
    if len == MAX_LENGTH {
        return Ok(network);
    }
    Ok(network | !mask_for(len)?)
}

/// Dotted-decimal subnet mask for a prefix length, e.g. `255.255.255.0`.
pub fn subnet_mask_text(len: u8) -> Result<String> {
    Ok(format_address(mask_for(len)?))
}

/// Number of addresses in a block, `2^(32 - len)`.
pub fn block_size(len: u8) -> Result<u64> {
    check_prefix(len)?;
    Ok(1u64 << (MAX_LENGTH - len))
}

/// True if `addr` has no host bits set under `len`.
pub fn is_aligned(addr: Address, len: u8) -> Result<bool> {
    Ok(network_address_of(addr, len)? == addr)
}

/// IPv4 network block in CIDR notation. The address is always the network address.
#[derive(Eq, Ord, PartialEq, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    /// Network address of the block.
    pub network: Address,
    /// Prefix length (0-32).
    pub prefix: u8,
}

impl Cidr {
    /// Parse a CIDR string (e.g., "10.0.0.0/24"). Host bits are cleared.
    pub fn new(addr_cidr: &str) -> Result<Cidr> {
        let addr_cidr = addr_cidr.trim();
        let (addr, prefix) = addr_cidr
            .split_once('/')
            .ok_or_else(|| CidrError::InvalidFormat(addr_cidr.to_string()))?;
        let addr = parse_address(addr)?;
        let prefix = parse_prefix_length(prefix)?;
        Cidr::from_parts(addr, prefix)
    }

    /// Build the block containing `addr` at prefix length `prefix`.
    pub fn from_parts(addr: Address, prefix: u8) -> Result<Cidr> {
        Ok(Cidr {
            network: network_address_of(addr, prefix)?,
            prefix,
        })
    }

    /// Lowest (network) address.
    pub fn lo(&self) -> Address {
        self.network
    }

    /// Highest (broadcast) address.
    pub fn hi(&self) -> Address {
        if self.prefix >= MAX_LENGTH {
            self.network
        } else {
            self.network | (u32::MAX >> self.prefix)
        }
    }

    /// True if `addr` lies inside this block.
    pub fn contains(&self, addr: Address) -> bool {
        self.lo() <= addr && addr <= self.hi()
    }

    /// The immediate parent block, `None` for /0.
    pub fn parent(&self) -> Option<Cidr> {
        let prefix = self.prefix.checked_sub(1)?;
        Cidr::from_parts(self.network, prefix).ok()
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self> {
        Cidr::new(s)
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.network), self.prefix)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}
