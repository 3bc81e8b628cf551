//! Total drawing order: timestamp driven, with ancestry tie-breaks.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::core::{CommitGraph, NodeIdx};
use crate::lineage::LineageAssigner;

/// Ancestry probes give up past this depth and report "not related".
const PROBE_DEPTH: usize = 25;

/// True when `target` is reachable from `start` along parent links
/// (`upward`) or child links. Bounded work-list walk; beyond
/// [`PROBE_DEPTH`] the answer is a conservative `false`.
fn reaches(graph: &CommitGraph, start: NodeIdx, target: NodeIdx, upward: bool) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![(start, 0usize)];
    while let Some((idx, depth)) = stack.pop() {
        if !seen.insert(idx) {
            continue;
        }
        let node = graph.node(idx);
        let links = if upward { &node.parents } else { &node.children };
        for &next in links {
            if next == target {
                return true;
            }
            if depth < PROBE_DEPTH {
                stack.push((next, depth + 1));
            }
        }
    }
    false
}

/// The comparator behind every ordering decision: `order` ascending, ties
/// broken so ancestors land before descendants. Unrelated ties keep their
/// existing relative position.
pub fn compare(graph: &CommitGraph, a: NodeIdx, b: NodeIdx) -> Ordering {
    let ord = graph.node(a).order.cmp(&graph.node(b).order);
    if ord != Ordering::Equal {
        return ord;
    }
    if reaches(graph, a, b, true) {
        // b sits in a's ancestry
        Ordering::Greater
    } else if reaches(graph, a, b, false) {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// Sort the whole graph into drawing order and rank rows.
///
/// The first sort fixes rows: position 0 is the oldest commit and takes
/// the bottom row, the newest takes row 0. The walk over that order then
/// brands synthetic lineages and sorts each node's children; both can
/// raise `order` values, so a second sort settles the final sequence.
/// Rows are not reassigned afterwards.
pub fn drawing_order(graph: &mut CommitGraph, assigner: &mut LineageAssigner) -> Vec<NodeIdx> {
    debug!(commits = graph.len(), "sorting");
    let mut order: Vec<NodeIdx> = (0..graph.len()).rev().collect();
    order.sort_by(|&a, &b| compare(graph, a, b));

    let count = order.len();
    for (position, &idx) in order.iter().enumerate() {
        graph.node_mut(idx).row = count - 1 - position;
        assigner.assign_synthetic(graph, idx, None);
        let mut children = std::mem::take(&mut graph.node_mut(idx).children);
        children.sort_by(|&a, &b| compare(graph, a, b));
        graph.node_mut(idx).children = children;
    }

    order.sort_by(|&a, &b| compare(graph, a, b));
    order
}
