//! Reusable horizontal track allocation.

use std::collections::HashMap;

use tracing::trace;

use crate::core::LaneIdx;

/// One horizontal track: owned by a branch, or free again from some row.
#[derive(Debug, Clone, PartialEq)]
pub enum Track {
    Occupied(String),
    /// Free for any request at this row or above. Placement proceeds from
    /// the bottom of the diagram, so row numbers shrink as it goes.
    Free(usize),
}

/// Greedy lane allocator.
///
/// Tracks are appended on demand and never removed; only their occupancy
/// changes. The side index keeps a branch pinned to one track for its whole
/// chain, however many times it is requested.
#[derive(Debug, Clone, Default)]
pub struct Slots {
    tracks: Vec<Track>,
    index: HashMap<String, LaneIdx>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracks ever created.
    pub fn lane_count(&self) -> usize {
        self.tracks.len()
    }

    /// Track for `branch` at `row`: the one it already owns, else the
    /// leftmost track freed at `row` or later, else a fresh track on the
    /// right edge.
    pub fn acquire(&mut self, row: usize, branch: &str) -> LaneIdx {
        if let Some(&lane) = self.index.get(branch) {
            return lane;
        }
        for (lane, track) in self.tracks.iter_mut().enumerate() {
            if matches!(*track, Track::Free(since) if since >= row) {
                *track = Track::Occupied(branch.to_string());
                self.index.insert(branch.to_string(), lane);
                trace!(lane, row, branch, "track reused");
                return lane;
            }
        }
        let lane = self.tracks.len();
        self.tracks.push(Track::Occupied(branch.to_string()));
        self.index.insert(branch.to_string(), lane);
        trace!(lane, row, branch, "track appended");
        lane
    }

    /// Mark `lane` free from `row` upward, provided it is currently bound
    /// to `branch`. Lane 0 is never released: the primary lineage keeps the
    /// left edge for the life of the diagram.
    pub fn release(&mut self, lane: LaneIdx, row: usize, branch: &str) {
        if lane == 0 {
            return;
        }
        match self.tracks.get(lane) {
            Some(Track::Occupied(owner)) if owner.as_str() == branch => {}
            _ => return,
        }
        self.tracks[lane] = Track::Free(row);
        self.index.remove(branch);
        trace!(lane, row, branch, "track released");
    }
}
