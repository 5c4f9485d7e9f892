//! Interactive IPv4 subnet partitioning.
//!
//! Start from one network block, split it into halves or merge sibling
//! halves back, and always keep a list of subnets that exactly tiles the
//! starting block.
//!
//! - [`models`] - address math, CIDR blocks and subnet descriptors
//! - [`processing`] - divide/join, hierarchy grouping and the session
//! - [`output`] - table rendering and CSV/JSON export

pub mod cmd;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::{CidrError, Result};
pub use models::{Cidr, NetworkInput, SubnetDescriptor, SubnetId};
pub use processing::{Partition, Session};
