//! Divide and join over the working set of subnets.
//!
//! A [`Partition`] is an ordered list of descriptors that exactly tiles the
//! block it was started from. Commands return a new partition and leave the
//! old one untouched, so a failed command is a no-op.

use crate::error::{CidrError, Result};
use crate::models::{
    block_size, format_address, initial_block, network_address_of, Address, Cidr,
    SubnetDescriptor, SubnetId, MAX_LENGTH,
};

/// Sort into canonical order: network address, then larger blocks first.
pub fn sort_subnets(subnets: &mut [SubnetDescriptor]) {
    subnets.sort_by_key(|s| (s.sort_key(), s.prefix_length()));
}

/// Split a subnet into its two halves.
///
/// The first child keeps the network address; the second starts one child
/// block further on.
pub fn divide_subnet(subnet: &SubnetDescriptor) -> Result<(SubnetDescriptor, SubnetDescriptor)> {
    if subnet.prefix_length() >= MAX_LENGTH {
        return Err(CidrError::NotDivisible(subnet.cidr()));
    }
    let child_prefix = subnet.prefix_length() + 1;
    let child_size = block_size(child_prefix)? as u32;
    let second_network = subnet
        .network_address()
        .checked_add(child_size)
        .ok_or_else(|| CidrError::InvalidInput(format!("{} overflows on divide", subnet.cidr())))?;

    let first = SubnetDescriptor::build(subnet.network_address(), child_prefix)?;
    let second = SubnetDescriptor::build(second_network, child_prefix)?;
    Ok((first, second))
}

/// True if `a` and `b` are the two halves of one immediate parent block.
///
/// Both must share a prefix length in 1..=32 and normalize to the same
/// network one bit up. A /32 pair is joinable so that dividing a /31 can be
/// undone.
pub fn can_join(a: &SubnetDescriptor, b: &SubnetDescriptor) -> bool {
    let prefix = a.prefix_length();
    if prefix != b.prefix_length() || prefix == 0 || prefix > MAX_LENGTH {
        return false;
    }
    if a.network_address() == b.network_address() {
        return false;
    }
    match (
        network_address_of(a.network_address(), prefix - 1),
        network_address_of(b.network_address(), prefix - 1),
    ) {
        (Ok(pa), Ok(pb)) => pa == pb,
        _ => false,
    }
}

/// Merge two sibling subnets into their parent.
///
/// The parent gets a fresh id and no name.
pub fn join_subnets(a: &SubnetDescriptor, b: &SubnetDescriptor) -> Result<SubnetDescriptor> {
    if !can_join(a, b) {
        return Err(CidrError::NotJoinable(a.cidr(), b.cidr()));
    }
    let parent_prefix = a.prefix_length() - 1;
    let parent_network: Address = a.network_address().min(b.network_address());
    SubnetDescriptor::build(parent_network, parent_prefix)
}

/// Ordered set of subnets tiling the origin block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    origin: Cidr,
    subnets: Vec<SubnetDescriptor>,
}

impl Partition {
    /// Start a partition holding the single block that contains `any_address`.
    pub fn new(any_address: Address, prefix_length: u8) -> Result<Partition> {
        let subnets = initial_block(any_address, prefix_length)?;
        let origin = subnets[0].cidr();
        log::debug!("New partition from {origin}");
        Ok(Partition { origin, subnets })
    }

    /// The block the partition was started from.
    pub fn origin(&self) -> Cidr {
        self.origin
    }

    /// Subnets in canonical order.
    pub fn subnets(&self) -> &[SubnetDescriptor] {
        &self.subnets
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    pub fn get(&self, id: SubnetId) -> Option<&SubnetDescriptor> {
        self.subnets.iter().find(|s| s.id() == id)
    }

    /// Row index of `id`.
    pub fn position(&self, id: SubnetId) -> Result<usize> {
        self.subnets
            .iter()
            .position(|s| s.id() == id)
            .ok_or(CidrError::NotFound(id))
    }

    /// The subnet whose block is exactly `cidr`.
    pub fn find_by_cidr(&self, cidr: Cidr) -> Option<&SubnetDescriptor> {
        self.subnets.iter().find(|s| s.cidr() == cidr)
    }

    /// Replace subnet `id` with its two halves at the same position.
    pub fn divide(&self, id: SubnetId) -> Result<Partition> {
        let index = self.position(id)?;
        let (first, second) = divide_subnet(&self.subnets[index])?;
        log::debug!(
            "divide {} -> {} + {}",
            self.subnets[index].cidr(),
            first.cidr(),
            second.cidr()
        );

        let mut subnets = Vec::with_capacity(self.subnets.len() + 1);
        subnets.extend_from_slice(&self.subnets[..index]);
        subnets.push(first);
        subnets.push(second);
        subnets.extend_from_slice(&self.subnets[index + 1..]);

        Ok(Partition {
            origin: self.origin,
            subnets,
        })
    }

    /// Replace the sibling pair `a`, `b` with their parent.
    pub fn join(&self, a: SubnetId, b: SubnetId) -> Result<Partition> {
        let first = &self.subnets[self.position(a)?];
        let second = &self.subnets[self.position(b)?];
        if a == b {
            return Err(CidrError::NotJoinable(first.cidr(), second.cidr()));
        }
        let parent = join_subnets(first, second)?;
        log::debug!(
            "join {} + {} -> {}/{}",
            first.cidr(),
            second.cidr(),
            format_address(parent.network_address()),
            parent.prefix_length()
        );

        let mut subnets: Vec<SubnetDescriptor> = self
            .subnets
            .iter()
            .filter(|s| s.id() != a && s.id() != b)
            .cloned()
            .collect();
        subnets.push(parent);
        sort_subnets(&mut subnets);

        Ok(Partition {
            origin: self.origin,
            subnets,
        })
    }

    /// Change the label of one subnet in place. Derived fields are untouched.
    pub fn rename(&mut self, id: SubnetId, name: &str) -> Result<()> {
        let index = self.position(id)?;
        self.subnets[index].set_name(name);
        Ok(())
    }
}
