//! Graph data structures.

pub mod graph;
pub mod node;

pub use graph::{CommitGraph, GraphStats};
pub use node::{CommitNode, LaneIdx, NodeIdx};
