//! Error types for subnet calculations and partition commands.

use crate::models::{Address, Cidr, SubnetId};
use std::net::Ipv4Addr;
use thiserror::Error;

/// Result type alias for cidr-flow operations.
pub type Result<T> = std::result::Result<T, CidrError>;

/// Errors raised by address math, the descriptor builder and partition commands.
///
/// Every variant is recoverable. A failed command never changes the partition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
    /// Address text is not canonical dotted-decimal.
    #[error("Invalid IPv4 address: '{0}'")]
    InvalidFormat(String),

    /// Prefix length is not an integer in [0, 32].
    #[error("Invalid prefix length: '{0}' (must be 0-32)")]
    InvalidPrefixLength(String),

    /// Internal consistency failure, e.g. an unaligned network address.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The subnet is a /32 and has no room to split.
    #[error("Subnet {0} cannot be divided")]
    NotDivisible(Cidr),

    /// The two subnets are not siblings under one immediate parent.
    #[error("Subnets {0} and {1} cannot be joined")]
    NotJoinable(Cidr, Cidr),

    /// The id is not present in the current partition.
    #[error("Subnet id {0} not found in current partition")]
    NotFound(SubnetId),

    /// No exact sibling pair sits under the ancestor block.
    #[error("No join candidate under {}: expected 2 children /{}, found {found}", block_text(.ancestor, .level), child_prefix(.level))]
    NoCandidate {
        level: u8,
        ancestor: Address,
        found: usize,
    },

    /// A partition failed the tiling check.
    #[error("Partition invariant violated: {0}")]
    InvariantViolation(String),
}

fn block_text(ancestor: &Address, level: &u8) -> String {
    format!("{}/{}", Ipv4Addr::from(*ancestor), level)
}

fn child_prefix(level: &u8) -> u16 {
    u16::from(*level) + 1
}
