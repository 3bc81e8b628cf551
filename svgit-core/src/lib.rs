//! Commit-history lane diagrams.
//!
//! Turns a set of commit records and references into a deterministic
//! grid layout and serializes it to SVG. The phases run strictly in
//! sequence: ingest, connect, lineage assignment, ordering, placement,
//! projection. [`pipeline::compute`] drives them all.

pub mod config;
pub mod core;
pub mod input;
pub mod lineage;
pub mod order;
pub mod pipeline;
pub mod project;
pub mod render;
pub mod slots;

pub use config::{ConfigError, LayoutConfig, NodeShape, RenderOptions};
pub use core::{CommitGraph, CommitNode, GraphStats, LaneIdx, NodeIdx};
pub use input::{CommitRecord, RefKind, RefRecord, ReferenceSet, StashEntry, StashRecord};
pub use lineage::LineageAssigner;
pub use pipeline::compute;
pub use project::{Bounds, EdgeSpan, Layout, PlacedNode};
pub use render::SvgRenderer;
pub use slots::Slots;
