//! Layout and rendering configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::LaneIdx;

/// Geometry and graph-construction settings consumed by the layout engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Branch whose lineage anchors lane 0.
    pub primary_branch: String,
    /// Walk stash reflog entries as additional references.
    pub include_stashes: bool,
    /// Width and height of one grid cell in pixels.
    pub cell_size: f32,
    /// Blank space on the left edge of the diagram.
    pub left_margin: f32,
    /// Horizontal space reserved for the short-id label column.
    pub label_column_width: f32,
    /// Render at most this many rows, newest first. Placement is unaffected.
    pub row_limit: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            primary_branch: "master".to_string(),
            include_stashes: false,
            cell_size: 16.0,
            left_margin: 6.0,
            label_column_width: 62.0,
            row_limit: None,
        }
    }
}

impl LayoutConfig {
    /// Project a `(lane, row)` cell onto pixel coordinates.
    pub fn scale(&self, lane: LaneIdx, row: usize) -> (f32, f32) {
        let x = lane as f32 * self.cell_size + self.left_margin + self.label_column_width;
        let y = (row as f32 + 1.0) * self.cell_size;
        (x, y)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_branch.is_empty() {
            return Err(ConfigError::EmptyPrimaryBranch);
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !self.left_margin.is_finite()
            || self.left_margin < 0.0
            || !self.label_column_width.is_finite()
            || self.label_column_width < 0.0
        {
            return Err(ConfigError::InvalidMargin);
        }
        if self.row_limit == Some(0) {
            return Err(ConfigError::InvalidRowLimit);
        }
        Ok(())
    }
}

/// Glyph drawn for each commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeShape {
    Circle,
    Hexagon,
}

/// SVG serialization settings. All decoration layers are off by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub shape: NodeShape,
    pub stroke_width: f32,
    pub background: String,
    pub text_color: String,
    /// Draw the short-id label column.
    pub labels: bool,
    /// Attach hover titles to commit glyphs.
    pub titles: bool,
    /// Place the commit summary to the right of each row.
    pub descriptions: bool,
    /// Emit `data-*` attributes on commit glyphs.
    pub data_attributes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            shape: NodeShape::Hexagon,
            stroke_width: 2.0,
            background: "#333".to_string(),
            text_color: "#FFF".to_string(),
            labels: false,
            titles: false,
            descriptions: false,
            data_attributes: false,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ConfigError::InvalidStrokeWidth(self.stroke_width));
        }
        if self.background.is_empty() || self.text_color.is_empty() {
            return Err(ConfigError::EmptyColor);
        }
        Ok(())
    }
}

/// Rejected configuration, reported before any layout phase runs.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("cell size must be a positive number of pixels, got {0}")]
    InvalidCellSize(f32),
    #[error("margins must be finite and non-negative")]
    InvalidMargin,
    #[error("row limit must be at least 1")]
    InvalidRowLimit,
    #[error("primary branch name must not be empty")]
    EmptyPrimaryBranch,
    #[error("stroke width must be a positive number of pixels, got {0}")]
    InvalidStrokeWidth(f32),
    #[error("color values must not be empty")]
    EmptyColor,
}
