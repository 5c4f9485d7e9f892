//! Ancestor grouping for one-click joins.
//!
//! For every ancestor prefix level between the origin and the finest block
//! present, groups the rows that fall under each ancestor block. Canonical
//! order plus full coverage keeps those rows contiguous, so one linear pass
//! per level is enough and no tree is kept.

use super::partition::can_join;
use crate::error::{CidrError, Result};
use crate::models::{Address, Cidr, SubnetDescriptor, SubnetId, MAX_LENGTH};
use serde::Serialize;
use std::collections::BTreeMap;

/// Run of rows under one ancestor block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockSpan {
    pub first_index: usize,
    pub count: usize,
}

/// Ancestor levels to show, coarsest last.
///
/// Covers `origin_prefix` up to the finest prefix present, never past /31.
pub fn levels(subnets: &[SubnetDescriptor], origin_prefix: u8) -> Vec<u8> {
    let Some(finest) = subnets.iter().map(|s| s.prefix_length()).max() else {
        return Vec::new();
    };
    let end = finest.max(origin_prefix).min(MAX_LENGTH - 1);
    (origin_prefix..=end).rev().collect()
}

/// Group rows by their ancestor network at `level`.
///
/// Rows at `level` or coarser are not descendants and end the current run.
pub fn groups_at_level(subnets: &[SubnetDescriptor], level: u8) -> BTreeMap<Address, BlockSpan> {
    let mut groups = BTreeMap::new();
    let mut current: Option<(Address, BlockSpan)> = None;

    for (index, subnet) in subnets.iter().enumerate() {
        if subnet.prefix_length() <= level {
            if let Some((ancestor, span)) = current.take() {
                groups.insert(ancestor, span);
            }
            continue;
        }
        let Ok(ancestor) = subnet.ancestor_at(level) else {
            continue;
        };
        if let Some((current_ancestor, span)) = current.as_mut() {
            if *current_ancestor == ancestor {
                span.count += 1;
                continue;
            }
        }
        let next = BlockSpan {
            first_index: index,
            count: 1,
        };
        if let Some((prev, span)) = current.replace((ancestor, next)) {
            groups.insert(prev, span);
        }
    }
    if let Some((ancestor, span)) = current {
        groups.insert(ancestor, span);
    }
    groups
}

/// The exact sibling pair that would rebuild `ancestor` at `level`.
///
/// Succeeds only when exactly two rows sit one bit below `level` under the
/// ancestor. Any other count means the block was split unevenly.
pub fn join_candidate_at(
    subnets: &[SubnetDescriptor],
    level: u8,
    ancestor: Address,
) -> Result<(SubnetId, SubnetId)> {
    let children: Vec<&SubnetDescriptor> = subnets
        .iter()
        .filter(|s| u16::from(s.prefix_length()) == u16::from(level) + 1)
        .filter(|s| s.ancestor_at(level).map_or(false, |a| a == ancestor))
        .collect();

    match children.as_slice() {
        [a, b] => Ok((a.id(), b.id())),
        _ => {
            log::debug!(
                "No join candidate at /{level}: {} children found",
                children.len()
            );
            Err(CidrError::NoCandidate {
                level,
                ancestor,
                found: children.len(),
            })
        }
    }
}

/// What a hierarchy column shows on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyCell {
    /// First row of an ancestor group. `pair` is set when one click joins it.
    Start {
        ancestor: Cidr,
        span: BlockSpan,
        pair: Option<(SubnetId, SubnetId)>,
    },
    /// Covered by a group starting on an earlier row.
    Inside,
    /// Row is not a descendant at this level.
    Empty,
}

/// Groups and join candidates for every displayed level.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    levels: Vec<u8>,
    spans: BTreeMap<u8, BTreeMap<Address, BlockSpan>>,
    candidates: BTreeMap<(u8, Address), (SubnetId, SubnetId)>,
}

impl HierarchyIndex {
    pub fn build(subnets: &[SubnetDescriptor], origin_prefix: u8) -> HierarchyIndex {
        let levels = levels(subnets, origin_prefix);
        let mut spans = BTreeMap::new();
        let mut candidates = BTreeMap::new();

        for &level in &levels {
            let groups = groups_at_level(subnets, level);
            if groups.is_empty() {
                continue;
            }
            for &ancestor in groups.keys() {
                if let Ok(pair) = join_candidate_at(subnets, level, ancestor) {
                    candidates.insert((level, ancestor), pair);
                }
            }
            spans.insert(level, groups);
        }

        HierarchyIndex {
            levels,
            spans,
            candidates,
        }
    }

    /// Displayed levels, descending.
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub fn spans_at(&self, level: u8) -> Option<&BTreeMap<Address, BlockSpan>> {
        self.spans.get(&level)
    }

    pub fn candidate(&self, level: u8, ancestor: Address) -> Option<(SubnetId, SubnetId)> {
        self.candidates.get(&(level, ancestor)).copied()
    }

    /// Cell contents for `row` in the `level` column.
    pub fn cell(&self, level: u8, row: usize) -> HierarchyCell {
        let Some(groups) = self.spans.get(&level) else {
            return HierarchyCell::Empty;
        };
        for (&ancestor, &span) in groups {
            if span.first_index == row {
                return HierarchyCell::Start {
                    ancestor: Cidr {
                        network: ancestor,
                        prefix: level,
                    },
                    span,
                    pair: self.candidate(level, ancestor),
                };
            }
            if span.first_index < row && row < span.first_index + span.count {
                return HierarchyCell::Inside;
            }
        }
        HierarchyCell::Empty
    }
}

/// An immediate sibling pair and the block it rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinInfo {
    pub child1: SubnetId,
    pub child2: SubnetId,
    pub parent: Cidr,
}

/// Every sibling pair that can be joined right now, in row order.
pub fn find_joinable_pairs(subnets: &[SubnetDescriptor]) -> Vec<JoinInfo> {
    let mut pairs = Vec::new();
    let mut i = 0;
    while i + 1 < subnets.len() {
        let (a, b) = (&subnets[i], &subnets[i + 1]);
        if can_join(a, b) {
            if let Some(parent) = a.cidr().parent() {
                pairs.push(JoinInfo {
                    child1: a.id(),
                    child2: b.id(),
                    parent,
                });
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    pairs
}
