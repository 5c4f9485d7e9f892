//! Tiling checks for a partition.
//!
//! Verifies that a list of subnets is in canonical order, that every block is
//! aligned, that no two blocks overlap and that together they cover exactly
//! the origin block.

use crate::error::{CidrError, Result};
use crate::models::{format_address, is_aligned, Cidr, SubnetDescriptor};
use itertools::Itertools;
use std::collections::HashSet;

/// Check every partition invariant, returning the first violation found.
pub fn check_tiling(subnets: &[SubnetDescriptor], origin: Cidr) -> Result<()> {
    check_unique_ids(subnets)?;

    for s in subnets {
        if !is_aligned(s.network_address(), s.prefix_length())? {
            return Err(CidrError::InvariantViolation(format!(
                "{} is not aligned",
                s.cidr()
            )));
        }
    }

    for (prev, curr) in subnets.iter().tuple_windows() {
        if (prev.sort_key(), prev.prefix_length()) > (curr.sort_key(), curr.prefix_length()) {
            return Err(CidrError::InvariantViolation(format!(
                "{} sorts after {}",
                prev.cidr(),
                curr.cidr()
            )));
        }
        if prev.broadcast_address() >= curr.network_address() {
            return Err(CidrError::InvariantViolation(format!(
                "{} overlaps {}",
                prev.cidr(),
                curr.cidr()
            )));
        }
    }

    check_coverage(subnets, origin)
}

fn check_unique_ids(subnets: &[SubnetDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for s in subnets {
        if !seen.insert(s.id()) {
            return Err(CidrError::InvariantViolation(format!(
                "duplicate id {} on {}",
                s.id(),
                s.cidr()
            )));
        }
    }
    Ok(())
}

/// Blocks must run back to back from the origin's first to last address.
fn check_coverage(subnets: &[SubnetDescriptor], origin: Cidr) -> Result<()> {
    let (first, last) = match (subnets.first(), subnets.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(CidrError::InvariantViolation(format!(
                "no subnets cover {origin}"
            )))
        }
    };
    if first.network_address() != origin.lo() {
        return Err(CidrError::InvariantViolation(format!(
            "gap at start of {origin}: first block is {}",
            first.cidr()
        )));
    }
    if last.broadcast_address() != origin.hi() {
        return Err(CidrError::InvariantViolation(format!(
            "{origin} not covered to the end: last block is {}",
            last.cidr()
        )));
    }
    for (prev, curr) in subnets.iter().tuple_windows() {
        if u64::from(prev.broadcast_address()) + 1 != u64::from(curr.network_address()) {
            return Err(CidrError::InvariantViolation(format!(
                "gap between {} and {} starting at {}",
                prev.cidr(),
                curr.cidr(),
                format_address(prev.broadcast_address().wrapping_add(1))
            )));
        }
    }
    Ok(())
}
