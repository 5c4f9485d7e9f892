//! Partition processing logic.
//!
//! This module contains the business logic over the working set of subnets:
//! - [`partition`] - divide and join as partition state transitions
//! - [`hierarchy`] - ancestor grouping and join candidates
//! - [`tiling`] - partition invariant checks
//! - [`session`] - the owner of the current partition

mod hierarchy;
mod partition;
mod session;
mod tiling;

// Re-export public functions
pub use hierarchy::{
    find_joinable_pairs, groups_at_level, join_candidate_at, levels, BlockSpan, HierarchyCell,
    HierarchyIndex, JoinInfo,
};
pub use partition::{can_join, divide_subnet, join_subnets, sort_subnets, Partition};
pub use session::Session;
pub use tiling::check_tiling;
