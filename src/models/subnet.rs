//! Subnet descriptor model and builder.

use super::ipv4::{
    block_size, broadcast_address_of, format_address, is_aligned, network_address_of,
    subnet_mask_text, Address, Cidr, MAX_LENGTH,
};
use crate::error::{CidrError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Text shown where a usable host range does not exist.
pub const NOT_APPLICABLE: &str = "N/A";

/// Opaque, never reused subnet identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubnetId(Uuid);

impl SubnetId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        SubnetId(Uuid::new_v4())
    }

    /// Short prefix of the id, enough to tell rows apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SubnetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SubnetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(SubnetId(Uuid::parse_str(s)?))
    }
}

fn serialize_address<S: Serializer>(addr: &Address, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format_address(*addr))
}

fn serialize_opt_address<S: Serializer>(
    addr: &Option<Address>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match addr {
        Some(a) => s.serialize_str(&format_address(*a)),
        None => s.serialize_none(),
    }
}

/// One block of the partition with all derived fields.
///
/// Values are fixed at build time. Only `name` may change afterwards.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetDescriptor {
    id: SubnetId,
    name: Option<String>,
    #[serde(serialize_with = "serialize_address")]
    network_address: Address,
    prefix_length: u8,
    #[serde(serialize_with = "serialize_address")]
    broadcast_address: Address,
    subnet_mask: String,
    total_hosts: u64,
    usable_hosts: u64,
    #[serde(serialize_with = "serialize_opt_address")]
    first_usable_address: Option<Address>,
    #[serde(serialize_with = "serialize_opt_address")]
    last_usable_address: Option<Address>,
    sort_key: u32,
}

impl SubnetDescriptor {
    /// Build a descriptor for an aligned network address.
    ///
    /// Fails with [`CidrError::InvalidInput`] when `prefix_length` is above 32
    /// or `network_address` has host bits set. Callers normalize first with
    /// [`network_address_of`].
    pub fn build(network_address: Address, prefix_length: u8) -> Result<SubnetDescriptor> {
        if prefix_length > MAX_LENGTH {
            return Err(CidrError::InvalidInput(format!(
                "prefix length {prefix_length} out of range"
            )));
        }
        if !is_aligned(network_address, prefix_length)? {
            return Err(CidrError::InvalidInput(format!(
                "{} is not a network address for /{prefix_length}",
                format_address(network_address)
            )));
        }

        let broadcast_address = broadcast_address_of(network_address, prefix_length)?;
        let total_hosts = block_size(prefix_length)?;
        let (usable_hosts, first_usable_address, last_usable_address) = match prefix_length {
            32 => (1, Some(network_address), Some(network_address)),
            31 => (2, Some(network_address), Some(broadcast_address)),
            _ if total_hosts >= 2 => (
                total_hosts - 2,
                Some(network_address + 1),
                Some(broadcast_address - 1),
            ),
            _ => (0, None, None),
        };

        Ok(SubnetDescriptor {
            id: SubnetId::new(),
            name: None,
            network_address,
            prefix_length,
            broadcast_address,
            subnet_mask: subnet_mask_text(prefix_length)?,
            total_hosts,
            usable_hosts,
            first_usable_address,
            last_usable_address,
            sort_key: network_address,
        })
    }

    pub fn id(&self) -> SubnetId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replace the label. An empty or blank name clears it.
    pub fn set_name(&mut self, name: &str) {
        let name = name.trim();
        self.name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
    }

    pub fn network_address(&self) -> Address {
        self.network_address
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    pub fn broadcast_address(&self) -> Address {
        self.broadcast_address
    }

    /// Subnet mask as dotted-decimal text.
    pub fn subnet_mask(&self) -> &str {
        &self.subnet_mask
    }

    pub fn total_hosts(&self) -> u64 {
        self.total_hosts
    }

    pub fn usable_hosts(&self) -> u64 {
        self.usable_hosts
    }

    pub fn first_usable_address(&self) -> Option<Address> {
        self.first_usable_address
    }

    pub fn last_usable_address(&self) -> Option<Address> {
        self.last_usable_address
    }

    /// Numeric sort key, equal to the network address.
    pub fn sort_key(&self) -> u32 {
        self.sort_key
    }

    pub fn cidr(&self) -> Cidr {
        Cidr {
            network: self.network_address,
            prefix: self.prefix_length,
        }
    }

    /// Network address of the enclosing block at `level`.
    pub fn ancestor_at(&self, level: u8) -> Result<Address> {
        network_address_of(self.network_address, level)
    }

    /// `network - broadcast` text.
    pub fn host_address_range(&self) -> String {
        format!(
            "{} - {}",
            format_address(self.network_address),
            format_address(self.broadcast_address)
        )
    }

    /// `first - last` usable text, or the address itself for a /32.
    pub fn usable_host_range(&self) -> String {
        match (self.first_usable_address, self.last_usable_address) {
            (Some(first), Some(last)) if first == last => format_address(first),
            (Some(first), Some(last)) => {
                format!("{} - {}", format_address(first), format_address(last))
            }
            _ => NOT_APPLICABLE.to_string(),
        }
    }

    pub fn first_usable_text(&self) -> String {
        self.first_usable_address
            .map(format_address)
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }

    pub fn last_usable_text(&self) -> String {
        self.last_usable_address
            .map(format_address)
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }
}

impl fmt::Display for SubnetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({name})", self.cidr()),
            None => write!(f, "{}", self.cidr()),
        }
    }
}

/// Start a new partition from any address inside the wanted block.
///
/// The address is normalized to its network address first, so a host
/// address such as `10.1.2.3` with `/16` yields `10.1.0.0/16`.
pub fn initial_block(any_address: Address, prefix_length: u8) -> Result<Vec<SubnetDescriptor>> {
    if prefix_length > MAX_LENGTH {
        return Err(CidrError::InvalidPrefixLength(prefix_length.to_string()));
    }
    let network = network_address_of(any_address, prefix_length)?;
    if network != any_address {
        log::debug!(
            "Normalized {} to network {}/{prefix_length}",
            format_address(any_address),
            format_address(network)
        );
    }
    Ok(vec![SubnetDescriptor::build(network, prefix_length)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_address;

    fn ip(text: &str) -> Address {
        parse_address(text).unwrap()
    }

    #[test]
    fn test_build_slash_17() {
        let d = SubnetDescriptor::build(ip("192.168.0.0"), 17).unwrap();
        assert_eq!(d.usable_hosts(), 32766);
        assert_eq!(d.total_hosts(), 32768);
        assert_eq!(d.first_usable_text(), "192.168.0.1");
        assert_eq!(d.last_usable_text(), "192.168.127.254");
        assert_eq!(format_address(d.broadcast_address()), "192.168.127.255");
        assert_eq!(d.subnet_mask(), "255.255.128.0");
        assert_eq!(d.sort_key(), d.network_address());
        assert_eq!(d.host_address_range(), "192.168.0.0 - 192.168.127.255");
        assert_eq!(d.usable_host_range(), "192.168.0.1 - 192.168.127.254");
        assert!(d.name().is_none());
    }

    #[test]
    fn test_build_slash_31() {
        let d = SubnetDescriptor::build(ip("10.0.0.0"), 31).unwrap();
        assert_eq!(d.usable_hosts(), 2);
        assert_eq!(d.first_usable_text(), "10.0.0.0");
        assert_eq!(d.last_usable_text(), "10.0.0.1");
        assert_eq!(d.usable_host_range(), d.host_address_range());
    }

    #[test]
    fn test_build_slash_32() {
        let d = SubnetDescriptor::build(ip("10.0.0.7"), 32).unwrap();
        assert_eq!(d.usable_hosts(), 1);
        assert_eq!(d.total_hosts(), 1);
        assert_eq!(d.broadcast_address(), d.network_address());
        assert_eq!(d.first_usable_address(), Some(ip("10.0.0.7")));
        assert_eq!(d.last_usable_address(), Some(ip("10.0.0.7")));
        assert_eq!(d.usable_host_range(), "10.0.0.7");
    }

    #[test]
    fn test_build_slash_0() {
        let d = SubnetDescriptor::build(0, 0).unwrap();
        assert_eq!(d.total_hosts(), 1u64 << 32);
        assert_eq!(d.usable_hosts(), (1u64 << 32) - 2);
        assert_eq!(d.broadcast_address(), u32::MAX);
        assert_eq!(d.subnet_mask(), "0.0.0.0");
    }

    #[test]
    fn test_build_rejects_unaligned() {
        assert!(matches!(
            SubnetDescriptor::build(ip("10.0.0.1"), 24),
            Err(CidrError::InvalidInput(_))
        ));
        assert!(matches!(
            SubnetDescriptor::build(ip("10.0.0.0"), 33),
            Err(CidrError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_fresh_ids() {
        let a = SubnetDescriptor::build(ip("10.0.0.0"), 24).unwrap();
        let b = SubnetDescriptor::build(ip("10.0.0.0"), 24).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_set_name_keeps_id() {
        let mut d = SubnetDescriptor::build(ip("10.0.0.0"), 24).unwrap();
        let id = d.id();
        d.set_name(" office ");
        assert_eq!(d.name(), Some("office"));
        assert_eq!(d.id(), id);
        assert_eq!(d.to_string(), "10.0.0.0/24 (office)");
        d.set_name("");
        assert!(d.name().is_none());
    }

    #[test]
    fn test_initial_block_normalizes() {
        let block = initial_block(ip("10.1.2.3"), 16).unwrap();
        assert_eq!(block.len(), 1);
        assert_eq!(block[0].cidr().to_string(), "10.1.0.0/16");
        assert!(matches!(
            initial_block(ip("10.1.2.3"), 40),
            Err(CidrError::InvalidPrefixLength(_))
        ));
    }

    #[test]
    fn test_serialize_descriptor() {
        let d = SubnetDescriptor::build(ip("10.0.0.0"), 30).unwrap();
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["networkAddress"], "10.0.0.0");
        assert_eq!(v["broadcastAddress"], "10.0.0.3");
        assert_eq!(v["usableHosts"], 2);
        assert_eq!(v["firstUsableAddress"], "10.0.0.1");
        assert_eq!(v["prefixLength"], 30);
    }
}
