//! Branch identity assignment.
//!
//! References brand their first-parent chains in priority order; whatever
//! is still unbranded after ordering begins gets a synthetic lineage. The
//! first writer always wins, so an early reference claims the shared trunk
//! and later references keep only their unique suffix.

use tracing::{debug, trace};

use crate::core::{CommitGraph, NodeIdx};
use crate::input::ReferenceSet;

/// Stamps every node with a branch identity.
pub struct LineageAssigner {
    primary: String,
    initial: Option<NodeIdx>,
    synthetic_seq: u64,
}

impl LineageAssigner {
    pub fn new(primary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            initial: None,
            synthetic_seq: 0,
        }
    }

    /// The primary branch's initial commit, when one was identified.
    pub fn initial(&self) -> Option<NodeIdx> {
        self.initial
    }

    /// Process every reference in priority order: local branches with the
    /// primary hoisted first, then remote branches, then stash entries.
    /// Tags never drive lineage; they only attach display labels.
    pub fn assign_references(&mut self, graph: &mut CommitGraph, refs: &ReferenceSet) {
        debug!(
            branches = refs.branches.len(),
            remotes = refs.remote_branches.len(),
            tags = refs.tags.len(),
            stashes = refs.stashes.len(),
            "assigning reference lineages"
        );
        for (name, target) in refs.branches.iter().chain(&refs.remote_branches) {
            match graph.get(target) {
                Some(idx) => self.assign_from_reference(graph, idx, name),
                None => debug!(name, target, "reference target not ingested, skipped"),
            }
        }
        for (name, target) in &refs.tags {
            if let Some(idx) = graph.get(target) {
                graph.node_mut(idx).tags.push(name.clone());
            }
        }
        for entry in &refs.stashes {
            let Some(idx) = graph.get(&entry.target_id) else {
                debug!(name = entry.name.as_str(), "stash target not ingested, skipped");
                continue;
            };
            graph.node_mut(idx).is_stash = true;
            if let Some(parent) = entry
                .index_parent_id
                .as_deref()
                .and_then(|id| graph.get(id))
            {
                graph.node_mut(parent).is_stash = true;
            }
            self.assign_from_reference(graph, idx, &entry.name);
        }
    }

    /// Brand `start` and its first-parent chain with `name`, stopping at the
    /// first node that already carries a branch.
    pub fn assign_from_reference(&mut self, graph: &mut CommitGraph, start: NodeIdx, name: &str) {
        let mut cursor = Some(start);
        while let Some(idx) = cursor {
            let node = graph.node_mut(idx);
            if node.branch.is_some() {
                break;
            }
            node.branch = Some(name.to_string());
            if name == self.primary
                && self.initial.is_none()
                && node.parents.is_empty()
                && !node.children.is_empty()
            {
                trace!(commit = node.short_id.as_str(), "initial commit");
                self.initial = Some(idx);
            }
            cursor = node.parents.first().copied();
        }
    }

    /// Give an unbranded node a lineage and pull its first-connected child
    /// into the same lineage. Raising the child's order keeps the new
    /// segment contiguous once everything is re-sorted.
    pub fn assign_synthetic(&mut self, graph: &mut CommitGraph, start: NodeIdx, name: Option<String>) {
        let mut cursor = start;
        let mut pending = name;
        loop {
            if graph.node(cursor).branch.is_some() {
                return;
            }
            let branch = pending.take().unwrap_or_else(|| self.next_synthetic_name());
            trace!(commit = graph.node(cursor).short_id.as_str(), branch = branch.as_str(), "synthetic lineage");
            let node = graph.node_mut(cursor);
            node.branch = Some(branch.clone());
            let order = node.order;
            let Some(&child) = node.children.first() else {
                return;
            };
            let child_node = graph.node_mut(child);
            if child_node.order < order {
                child_node.order = order;
            }
            pending = Some(branch);
            cursor = child;
        }
    }

    // `~` cannot appear in a valid refname, so these never collide with
    // real branches.
    fn next_synthetic_name(&mut self) -> String {
        self.synthetic_seq += 1;
        format!("~{}", self.synthetic_seq)
    }
}
