//! Commit DAG arena and adjacency resolution.

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::debug;

use crate::core::node::{CommitNode, NodeIdx};
use crate::input::CommitRecord;

/// Owns every commit node plus the id lookup.
///
/// Nodes live in a flat arena and are addressed by [`NodeIdx`]; all
/// adjacency is stored as indices into the same arena.
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    nodes: Vec<CommitNode>,
    index: HashMap<String, NodeIdx>,
}

/// Structural counts over a connected graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub commits: usize,
    pub merges: usize,
    pub roots: usize,
    pub tips: usize,
}

impl CommitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest every record in reported order, then resolve the adjacency.
    pub fn from_records(records: Vec<CommitRecord>) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.add_commit(record);
        }
        graph.connect();
        graph
    }

    /// Add one commit. Idempotent per id: a commit reached again through a
    /// different traversal entry point maps onto the existing node.
    pub fn add_commit(&mut self, record: CommitRecord) -> NodeIdx {
        if let Some(&idx) = self.index.get(&record.id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(record.id.clone(), idx);
        self.nodes.push(CommitNode::new(record));
        idx
    }

    /// Resolve `parent_ids` into arena indices and back-fill `children`.
    ///
    /// Runs after all commits are ingested and before lineage assignment.
    /// A parent id absent from the graph marks a truncated history boundary
    /// and is dropped from the resolved links.
    pub fn connect(&mut self) {
        debug!(commits = self.nodes.len(), "connecting graph");
        for idx in 0..self.nodes.len() {
            let parent_ids = self.nodes[idx].parent_ids.clone();
            let mut parents: SmallVec<[NodeIdx; 2]> = SmallVec::new();
            for parent_id in &parent_ids {
                if let Some(&parent) = self.index.get(parent_id) {
                    parents.push(parent);
                    if !self.nodes[parent].children.contains(&idx) {
                        self.nodes[parent].children.push(idx);
                    }
                }
            }
            self.nodes[idx].parents = parents;
        }
    }

    /// Look up a node by commit id.
    pub fn get(&self, id: &str) -> Option<NodeIdx> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIdx) -> &CommitNode {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut CommitNode {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[CommitNode] {
        &self.nodes
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            commits: self.nodes.len(),
            merges: self.nodes.iter().filter(|n| n.is_merge()).count(),
            roots: self.nodes.iter().filter(|n| n.is_root()).count(),
            tips: self.nodes.iter().filter(|n| n.children.is_empty()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, parents: &[&str]) -> CommitRecord {
        CommitRecord {
            id: id.to_string(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            timestamp_ms: 1000,
            author: "a <a@example.com>".to_string(),
            committer: "a <a@example.com>".to_string(),
            message: format!("commit {id}"),
            summary: format!("commit {id}"),
        }
    }

    #[test]
    fn add_commit_is_idempotent() {
        let mut graph = CommitGraph::new();
        let first = graph.add_commit(record("aaa", &[]));
        let second = graph.add_commit(record("aaa", &[]));
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn connect_resolves_parents_and_children() {
        let graph = CommitGraph::from_records(vec![
            record("ccc", &["bbb"]),
            record("bbb", &["aaa"]),
            record("aaa", &[]),
        ]);
        let a = graph.get("aaa").unwrap();
        let b = graph.get("bbb").unwrap();
        let c = graph.get("ccc").unwrap();
        assert_eq!(graph.node(c).parents.as_slice(), &[b]);
        assert_eq!(graph.node(b).parents.as_slice(), &[a]);
        assert_eq!(graph.node(a).children.as_slice(), &[b]);
        assert_eq!(graph.node(b).children.as_slice(), &[c]);
    }

    #[test]
    fn connect_drops_missing_parents() {
        let graph = CommitGraph::from_records(vec![record("bbb", &["gone"])]);
        let b = graph.get("bbb").unwrap();
        assert!(graph.node(b).parents.is_empty());
        assert_eq!(graph.node(b).parent_ids, vec!["gone".to_string()]);
    }

    #[test]
    fn connect_keeps_parent_order() {
        let graph = CommitGraph::from_records(vec![
            record("merge", &["first", "second"]),
            record("first", &[]),
            record("second", &[]),
        ]);
        let m = graph.get("merge").unwrap();
        let f = graph.get("first").unwrap();
        let s = graph.get("second").unwrap();
        assert_eq!(graph.node(m).parents.as_slice(), &[f, s]);
    }

    #[test]
    fn stats_counts_structure() {
        let graph = CommitGraph::from_records(vec![
            record("merge", &["left", "right"]),
            record("left", &["root"]),
            record("right", &["root"]),
            record("root", &[]),
        ]);
        let stats = graph.stats();
        assert_eq!(
            stats,
            GraphStats {
                commits: 4,
                merges: 1,
                roots: 1,
                tips: 1,
            }
        );
    }
}
