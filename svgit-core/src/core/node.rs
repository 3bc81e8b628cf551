//! Commit node type shared by every layout phase.

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

use crate::input::CommitRecord;

/// Arena position of a node within its graph.
pub type NodeIdx = usize;

/// Horizontal track index in the lane diagram.
pub type LaneIdx = usize;

/// A commit in the layout graph.
///
/// Nodes are created once per unique id and never removed. `branch`, `row`
/// and `lane` are written by later phases; `order` starts at the commit
/// timestamp and is only ever raised.
#[derive(Debug, Clone)]
pub struct CommitNode {
    pub id: String,
    /// First eight characters of `id`, used for labels and titles.
    pub short_id: String,
    /// Parent ids as recorded; kept for diagnostics after resolution.
    pub parent_ids: Vec<String>,
    /// Resolved parent indices. Parents outside the graph are dropped.
    pub parents: SmallVec<[NodeIdx; 2]>,
    /// Resolved child indices, accumulated during connection.
    pub children: SmallVec<[NodeIdx; 2]>,
    pub timestamp_ms: i64,
    /// Ranking key for the total order.
    pub order: i64,
    /// Lineage identity; `None` until assignment reaches the node.
    pub branch: Option<String>,
    /// Tag names attached to this commit. Display only.
    pub tags: Vec<String>,
    /// Reachable through a stash entry; changes stroke style, not placement.
    pub is_stash: bool,
    /// Vertical position, 0 is the newest row. Valid after ordering.
    pub row: usize,
    /// Horizontal track; `None` until the allocator visits the node.
    pub lane: Option<LaneIdx>,
    pub author: String,
    pub committer: String,
    pub message: String,
    pub summary: String,
    /// Attribute-safe squeeze of the message used for hover titles.
    pub brief: String,
}

impl CommitNode {
    pub fn new(record: CommitRecord) -> Self {
        let CommitRecord {
            id,
            parent_ids,
            timestamp_ms,
            author,
            committer,
            message,
            summary,
        } = record;
        let short_id = id.chars().take(8).collect();
        let brief = brief_of(&message);
        Self {
            short_id,
            brief,
            id,
            parent_ids,
            parents: SmallVec::new(),
            children: SmallVec::new(),
            timestamp_ms,
            order: timestamp_ms,
            branch: None,
            tags: Vec::new(),
            is_stash: false,
            row: 0,
            lane: None,
            author,
            committer,
            message,
            summary,
        }
    }

    /// No resolved parents: an initial commit or a truncation boundary.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// First message line, capped at 100 graphemes, squeezed down to word
/// characters and spaces.
fn brief_of(message: &str) -> String {
    let head: String = message.graphemes(true).take(100).collect();
    let head = head.split('\n').next().unwrap_or("");
    head.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}
