//! Domain models for subnet partitioning.
//!
//! This module contains the core data structures used throughout the application:
//! - [`ipv4`] - address math and the [`Cidr`] block type
//! - [`SubnetDescriptor`] - one block of the partition with derived fields
//! - [`NetworkInput`] - the start-network form and its per-field errors

mod input;
mod ipv4;
mod subnet;

// Re-export public types
pub use input::{InputErrors, NetworkInput};
pub use ipv4::{
    block_size, broadcast_address_of, format_address, is_aligned, mask_for, network_address_of,
    parse_address, parse_prefix_length, subnet_mask_text, validate_prefix_length, Address, Cidr,
    MAX_LENGTH,
};
pub use subnet::{initial_block, SubnetDescriptor, SubnetId, NOT_APPLICABLE};
