//! Lane placement and pixel projection.

use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::config::LayoutConfig;
use crate::core::{CommitGraph, LaneIdx, NodeIdx};
use crate::slots::Slots;

/// A commit with settled geometry.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedNode {
    pub id: String,
    pub short_id: String,
    pub x: f32,
    pub y: f32,
    pub lane: LaneIdx,
    pub row: usize,
    pub branch: String,
    pub tags: Vec<String>,
    pub is_stash: bool,
    pub author: String,
    pub timestamp_ms: i64,
    pub summary: String,
    pub brief: String,
}

/// One parent-to-child connection, classified for drawing.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeSpan {
    pub from_lane: LaneIdx,
    pub from_row: usize,
    pub to_lane: LaneIdx,
    pub to_row: usize,
    /// Both endpoints share a lane; drawn as a plain vertical line.
    pub straight: bool,
    /// Branch whose color the connection takes.
    pub branch: String,
    pub is_stash: bool,
}

/// Maximum pixel extents over all placed nodes and edges.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// The engine's output: everything a renderer needs, in drawing order.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub config: LayoutConfig,
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<EdgeSpan>,
    pub bounds: Bounds,
    /// Rightmost ink per row, for placing text beside the diagram.
    pub row_max_x: Vec<f32>,
    /// Number of tracks the diagram ended up using.
    pub lane_count: usize,
    /// Id of the primary branch's initial commit, when one was identified.
    pub initial: Option<String>,
}

/// Assigns lanes over the final order and emits drawable geometry.
pub struct LayoutProjector<'a> {
    config: &'a LayoutConfig,
    slots: Slots,
}

impl<'a> LayoutProjector<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            slots: Slots::new(),
        }
    }

    /// Rows must be final before this runs; placement walks the order
    /// oldest to newest, so requested rows only ever decrease.
    pub fn run(
        mut self,
        graph: &mut CommitGraph,
        order: &[NodeIdx],
        initial: Option<NodeIdx>,
    ) -> Layout {
        debug!(commits = order.len(), "placing");
        for &idx in order {
            self.place(graph, idx);
        }
        self.project(graph, order, initial)
    }

    /// Lane assignment for one node: claim a track if the node has none,
    /// push it down the same-branch descendant chain, give the track back
    /// when no child continues the branch, then let the remaining children
    /// claim their own.
    fn place(&mut self, graph: &mut CommitGraph, idx: NodeIdx) {
        let row = graph.node(idx).row;
        let branch = branch_of(graph, idx);
        let lane = match graph.node(idx).lane {
            Some(lane) => lane,
            None => {
                let lane = self.slots.acquire(row, &branch);
                graph.node_mut(idx).lane = Some(lane);
                lane
            }
        };

        // The whole same-branch chain above inherits this track.
        let mut cursor = idx;
        while let Some(child) = same_branch_child(graph, cursor) {
            if graph.node(child).lane.is_some() {
                break;
            }
            graph.node_mut(child).lane = Some(lane);
            cursor = child;
        }

        let continues = graph
            .node(idx)
            .children
            .iter()
            .any(|&c| graph.node(c).branch == graph.node(idx).branch);
        if !continues {
            self.slots.release(lane, row, &branch);
        }

        // Fan out: children on other branches claim tracks now, in sorted
        // order, so a just-released track is up for grabs.
        let children: SmallVec<[NodeIdx; 2]> = graph.node(idx).children.clone();
        for child in children {
            if graph.node(child).branch == graph.node(idx).branch {
                continue;
            }
            if graph.node(child).lane.is_none() {
                let child_branch = branch_of(graph, child);
                let child_row = graph.node(child).row;
                let child_lane = self.slots.acquire(child_row, &child_branch);
                graph.node_mut(child).lane = Some(child_lane);
            }
        }
    }

    fn project(self, graph: &CommitGraph, order: &[NodeIdx], initial: Option<NodeIdx>) -> Layout {
        let count = order.len();
        let mut nodes = Vec::with_capacity(count);
        let mut edges = Vec::new();
        let mut bounds = Bounds::default();
        let mut row_max_x = vec![0.0f32; count];

        for &idx in order {
            let node = graph.node(idx);
            let lane = node.lane.unwrap_or_default();
            let (x, y) = self.config.scale(lane, node.row);
            bounds.width = bounds.width.max(x);
            bounds.height = bounds.height.max(y);
            if let Some(max) = row_max_x.get_mut(node.row) {
                *max = max.max(x);
            }
            nodes.push(PlacedNode {
                id: node.id.clone(),
                short_id: node.short_id.clone(),
                x,
                y,
                lane,
                row: node.row,
                branch: node.branch.clone().unwrap_or_default(),
                tags: node.tags.clone(),
                is_stash: node.is_stash,
                author: node.author.clone(),
                timestamp_ms: node.timestamp_ms,
                summary: node.summary.clone(),
                brief: node.brief.clone(),
            });

            for &child in &node.children {
                let child_node = graph.node(child);
                let child_lane = child_node.lane.unwrap_or_default();
                let straight = child_lane == lane;
                let branch = if straight || child_lane > lane {
                    branch_of(graph, child)
                } else {
                    branch_of(graph, idx)
                };
                edges.push(EdgeSpan {
                    from_lane: lane,
                    from_row: node.row,
                    to_lane: child_lane,
                    to_row: child_node.row,
                    straight,
                    branch,
                    is_stash: node.is_stash || child_node.is_stash,
                });
            }
        }

        // Edge ink also pushes each row's right boundary outward.
        for edge in &edges {
            let outer = edge.from_lane.max(edge.to_lane);
            let (x, _) = self.config.scale(outer, 0);
            let lo = edge.from_row.min(edge.to_row);
            let hi = edge.from_row.max(edge.to_row);
            for row in lo..=hi {
                if let Some(max) = row_max_x.get_mut(row) {
                    *max = max.max(x);
                }
            }
        }

        debug!(
            lanes = self.slots.lane_count(),
            width = bounds.width,
            height = bounds.height,
            "projected"
        );

        Layout {
            config: self.config.clone(),
            nodes,
            edges,
            bounds,
            row_max_x,
            lane_count: self.slots.lane_count(),
            initial: initial.map(|idx| graph.node(idx).id.clone()),
        }
    }
}

fn branch_of(graph: &CommitGraph, idx: NodeIdx) -> String {
    graph.node(idx).branch.clone().unwrap_or_default()
}

/// First child carrying the same branch as `idx`, in sorted child order.
fn same_branch_child(graph: &CommitGraph, idx: NodeIdx) -> Option<NodeIdx> {
    let node = graph.node(idx);
    node.children
        .iter()
        .copied()
        .find(|&c| graph.node(c).branch == node.branch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{CommitRecord, RefRecord, ReferenceSet};
    use crate::lineage::LineageAssigner;
    use crate::order::drawing_order;

    fn record(id: &str, parents: &[&str], timestamp_ms: i64) -> CommitRecord {
        CommitRecord {
            id: id.to_string(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            timestamp_ms,
            author: "a <a@example.com>".to_string(),
            committer: "a <a@example.com>".to_string(),
            message: format!("commit {id}"),
            summary: format!("commit {id}"),
        }
    }

    fn layout_for(records: Vec<CommitRecord>, refs: &[RefRecord]) -> (Layout, CommitGraph) {
        let config = LayoutConfig::default();
        let set = ReferenceSet::from_records("master", refs, &[], false);
        let mut graph = CommitGraph::from_records(records);
        let mut assigner = LineageAssigner::new("master");
        assigner.assign_references(&mut graph, &set);
        let order = drawing_order(&mut graph, &mut assigner);
        let initial = assigner.initial();
        let layout = LayoutProjector::new(&config).run(&mut graph, &order, initial);
        (layout, graph)
    }

    fn placed<'a>(layout: &'a Layout, id: &str) -> &'a PlacedNode {
        layout.nodes.iter().find(|n| n.id == id).unwrap()
    }

    #[test]
    fn linear_history_keeps_one_lane() {
        let (layout, _) = layout_for(
            vec![
                record("ccc", &["bbb"], 3000),
                record("bbb", &["aaa"], 2000),
                record("aaa", &[], 1000),
            ],
            &[RefRecord::branch("master", "ccc")],
        );
        assert_eq!(layout.lane_count, 1);
        assert!(layout.nodes.iter().all(|n| n.lane == 0));
        assert_eq!(layout.edges.len(), 2);
        assert!(layout.edges.iter().all(|e| e.straight));
        assert_eq!(placed(&layout, "ccc").row, 0);
        assert_eq!(placed(&layout, "aaa").row, 2);
    }

    #[test]
    fn fork_takes_a_second_lane() {
        let (layout, _) = layout_for(
            vec![
                record("fff", &["aaa"], 4000),
                record("mmm", &["aaa"], 3000),
                record("aaa", &[], 1000),
            ],
            &[
                RefRecord::branch("master", "mmm"),
                RefRecord::branch("feature", "fff"),
            ],
        );
        assert_eq!(placed(&layout, "aaa").lane, 0);
        assert_eq!(placed(&layout, "mmm").lane, 0);
        assert_eq!(placed(&layout, "fff").lane, 1);
        let elbow = layout
            .edges
            .iter()
            .find(|e| !e.straight)
            .expect("fork edge bends");
        assert_eq!(elbow.to_lane, 1);
        // a rightward bend takes the child's branch color
        assert_eq!(elbow.branch, "feature");
    }

    #[test]
    fn merge_edge_takes_parent_branch_when_bending_left() {
        // feature merges back into master
        let (layout, _) = layout_for(
            vec![
                record("merge", &["mmm", "fff"], 5000),
                record("fff", &["aaa"], 4000),
                record("mmm", &["aaa"], 3000),
                record("aaa", &[], 1000),
            ],
            &[
                RefRecord::branch("master", "merge"),
                RefRecord::branch("feature", "fff"),
            ],
        );
        assert_eq!(placed(&layout, "merge").lane, 0);
        assert_eq!(placed(&layout, "fff").lane, 1);
        let inbound = layout
            .edges
            .iter()
            .find(|e| e.from_lane == 1 && e.to_lane == 0)
            .expect("merge edge bends left");
        assert!(!inbound.straight);
        assert_eq!(inbound.branch, "feature");
    }

    #[test]
    fn released_lane_is_reused_by_a_later_fork() {
        // feature merges at row 2; topic forks above it and may take lane 1
        let (layout, _) = layout_for(
            vec![
                record("top", &["merge"], 7000),
                record("ttt", &["merge"], 6000),
                record("merge", &["mmm", "fff"], 5000),
                record("fff", &["aaa"], 4000),
                record("mmm", &["aaa"], 3000),
                record("aaa", &[], 1000),
            ],
            &[
                RefRecord::branch("master", "top"),
                RefRecord::branch("feature", "fff"),
                RefRecord::branch("topic", "ttt"),
            ],
        );
        assert_eq!(placed(&layout, "fff").lane, 1);
        assert_eq!(placed(&layout, "ttt").lane, 1);
        assert_eq!(layout.lane_count, 2);
    }

    #[test]
    fn no_two_nodes_share_a_cell() {
        let (layout, _) = layout_for(
            vec![
                record("merge", &["mmm", "fff"], 5000),
                record("fff", &["bbb"], 4000),
                record("mmm", &["bbb"], 3000),
                record("bbb", &["aaa"], 2000),
                record("aaa", &[], 1000),
            ],
            &[
                RefRecord::branch("master", "merge"),
                RefRecord::branch("feature", "fff"),
            ],
        );
        for (i, a) in layout.nodes.iter().enumerate() {
            for b in layout.nodes.iter().skip(i + 1) {
                assert!(
                    a.row != b.row || a.lane != b.lane,
                    "{} and {} share cell ({}, {})",
                    a.id,
                    b.id,
                    a.lane,
                    a.row
                );
            }
        }
    }

    #[test]
    fn pixel_projection_uses_the_affine_grid() {
        let (layout, _) = layout_for(
            vec![
                record("bbb", &["aaa"], 2000),
                record("aaa", &[], 1000),
            ],
            &[RefRecord::branch("master", "bbb")],
        );
        let b = placed(&layout, "bbb");
        let a = placed(&layout, "aaa");
        assert_eq!((b.x, b.y), (68.0, 16.0));
        assert_eq!((a.x, a.y), (68.0, 32.0));
        assert_eq!(layout.bounds.width, 68.0);
        assert_eq!(layout.bounds.height, 32.0);
    }

    #[test]
    fn row_max_x_covers_edge_ink() {
        let (layout, _) = layout_for(
            vec![
                record("fff", &["aaa"], 4000),
                record("mmm", &["aaa"], 3000),
                record("aaa", &[], 1000),
            ],
            &[
                RefRecord::branch("master", "mmm"),
                RefRecord::branch("feature", "fff"),
            ],
        );
        // the fork edge occupies lane 1 from aaa's row up to fff's row
        let (lane1_x, _) = layout.config.scale(1, 0);
        let aaa = placed(&layout, "aaa");
        let fff = placed(&layout, "fff");
        for row in fff.row..=aaa.row {
            assert!(layout.row_max_x[row] >= lane1_x, "row {row} too narrow");
        }
    }

    #[test]
    fn initial_commit_id_is_reported() {
        let (layout, _) = layout_for(
            vec![
                record("bbb", &["aaa"], 2000),
                record("aaa", &[], 1000),
            ],
            &[RefRecord::branch("master", "bbb")],
        );
        assert_eq!(layout.initial.as_deref(), Some("aaa"));
    }

    #[test]
    fn empty_history_produces_an_empty_layout() {
        let (layout, _) = layout_for(vec![], &[]);
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
        assert_eq!(layout.lane_count, 0);
        assert_eq!(layout.bounds.width, 0.0);
        assert_eq!(layout.bounds.height, 0.0);
    }
}
