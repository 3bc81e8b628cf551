//! SVG serialization of a computed layout.
//!
//! Output is grouped so stacking works without z-order attributes: lane
//! line groups from the rightmost lane down to lane 0, then glyphs, then
//! text. Later groups paint on top, which keeps the primary lineage's line
//! and every glyph visible at crossings.

use chrono::{TimeZone, Utc};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::config::{ConfigError, NodeShape, RenderOptions};
use crate::project::{Layout, PlacedNode};
use crate::render::palette::Palette;

/// Estimated advance of one monospace column at the label font size.
const TEXT_COLUMN_PX: f32 = 6.0;

/// Longest description line, in display columns.
const DESCRIPTION_COLUMNS: usize = 80;

/// Append-only element groups rendered in creation order.
#[derive(Debug, Default)]
struct SvgDoc {
    width: f32,
    height: f32,
    background: String,
    groups: Vec<Vec<String>>,
}

impl SvgDoc {
    fn group(&mut self) -> usize {
        self.groups.push(Vec::new());
        self.groups.len() - 1
    }

    fn push(&mut self, group: usize, element: String) {
        self.groups[group].push(element);
    }

    fn render(&self) -> String {
        let width = self.width + 10.0;
        let height = self.height + 10.0;
        let mut out = format!(
            "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" \
             xmlns=\"http://www.w3.org/2000/svg\" style=\"background-color: {};\">",
            self.background
        );
        for group in &self.groups {
            out.push_str("<g>");
            for element in group {
                out.push_str(element);
            }
            out.push_str("</g>");
        }
        out.push_str("</svg>");
        out
    }
}

/// Serializes a [`Layout`] to SVG markup.
pub struct SvgRenderer {
    options: RenderOptions,
}

impl SvgRenderer {
    pub fn new(options: RenderOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(&self, layout: &Layout) -> String {
        let config = &layout.config;
        let cell = config.cell_size;
        let radius = cell / 4.0;
        let stroke_width = self.options.stroke_width;
        let row_limit = config.row_limit.unwrap_or(usize::MAX);
        let mut palette = Palette::new(&config.primary_branch);

        let mut doc = SvgDoc {
            background: self.options.background.clone(),
            ..SvgDoc::default()
        };

        // Rightmost lane group first so lane 0 ends up painted on top.
        let mut lane_groups = vec![0usize; layout.lane_count];
        for lane in (0..layout.lane_count).rev() {
            lane_groups[lane] = doc.group();
        }
        let dots = doc.group();
        let labels = doc.group();

        let mut width = 0.0f32;
        let mut height = 0.0f32;

        for edge in &layout.edges {
            // An edge draws with its parent's row.
            if edge.from_row >= row_limit {
                continue;
            }
            let (nx, ny) = config.scale(edge.from_lane, edge.from_row);
            let (cx, cy) = config.scale(edge.to_lane, edge.to_row);
            width = width.max(nx).max(cx);
            height = height.max(ny).max(cy);

            let color = palette.color(&edge.branch);
            let dash = if edge.is_stash {
                " stroke-dasharray=\"3,3\""
            } else {
                ""
            };
            if edge.straight {
                doc.push(
                    lane_groups[edge.to_lane],
                    format!(
                        "<line x1=\"{nx}\" y1=\"{ny}\" x2=\"{cx}\" y2=\"{cy}\" \
                         stroke=\"{color}\" stroke-width=\"{stroke_width}px\" fill=\"{color}\"{dash}/>"
                    ),
                );
            } else {
                // Bevel the corner a few pixels before the turn.
                let d = if cx > nx {
                    format!(
                        "M{nx},{ny} L{},{ny} L{cx},{} L{cx},{cy}",
                        cx - 3.0,
                        ny - 3.0
                    )
                } else {
                    format!(
                        "M{cx},{cy} L{},{cy} L{nx},{} L{nx},{ny}",
                        nx - 3.0,
                        cy + 3.0
                    )
                };
                doc.push(
                    lane_groups[edge.from_lane.max(edge.to_lane)],
                    format!(
                        "<path d=\"{d}\" stroke=\"{color}\" stroke-width=\"{stroke_width}px\" \
                         fill=\"transparent\"{dash} stroke-linejoin=\"round\"/>"
                    ),
                );
            }
        }

        for node in &layout.nodes {
            if node.row >= row_limit {
                continue;
            }
            let (nx, ny) = (node.x, node.y);
            width = width.max(nx);
            height = height.max(ny);
            let color = palette.color(&node.branch);

            if self.options.labels {
                doc.push(
                    labels,
                    format!(
                        "<text x=\"{}\" y=\"{}\" fill=\"{}\" text-anchor=\"start\" \
                         font-size=\"10px\" font-weight=\"300\" font-family=\"monospace\">{}</text>",
                        config.left_margin,
                        ny + 3.0,
                        self.options.text_color,
                        escape_xml(&node.short_id.to_uppercase())
                    ),
                );
            }

            let title = if self.options.titles {
                format!(
                    "<title>{}</title>",
                    escape_xml(&format!("[{}] {}: {}", node.branch, node.short_id, node.brief))
                )
            } else {
                String::new()
            };
            let data = if self.options.data_attributes {
                format!(
                    " data-id=\"{}\" data-branch=\"{}\" data-lane=\"{}\" data-row=\"{}\" \
                     data-author=\"{}\" data-timestamp=\"{}\"",
                    escape_xml(&node.id),
                    escape_xml(&node.branch),
                    node.lane,
                    node.row,
                    escape_xml(&node.author),
                    node.timestamp_ms
                )
            } else {
                String::new()
            };
            let dash = if node.is_stash {
                " stroke-dasharray=\"3,3\""
            } else {
                ""
            };

            let (open, tag) = match self.options.shape {
                NodeShape::Hexagon => (
                    format!(
                        "<polygon points=\"{}\" stroke=\"{color}\" \
                         stroke-width=\"{stroke_width}px\" fill=\"{}\"{data}{dash}",
                        hexagon_points(nx, ny, radius + 1.0),
                        self.options.background
                    ),
                    "polygon",
                ),
                NodeShape::Circle => (
                    format!(
                        "<circle cx=\"{nx}\" cy=\"{ny}\" r=\"{radius}\" stroke=\"{color}\" \
                         stroke-width=\"{stroke_width}px\" fill=\"{}\"{data}{dash}",
                        self.options.background
                    ),
                    "circle",
                ),
            };
            let element = if title.is_empty() {
                format!("{open}/>")
            } else {
                format!("{open}>{title}</{tag}>")
            };
            doc.push(dots, element);

            if self.options.descriptions {
                let anchor = layout.row_max_x.get(node.row).copied().unwrap_or(nx) + cell;
                let text = description_text(node);
                doc.push(
                    labels,
                    format!(
                        "<text x=\"{anchor}\" y=\"{}\" fill=\"{}\" text-anchor=\"start\" \
                         font-size=\"10px\" font-weight=\"300\" font-family=\"monospace\">{}</text>",
                        ny + 3.0,
                        self.options.text_color,
                        escape_xml(&text)
                    ),
                );
                width = width.max(anchor + text.width() as f32 * TEXT_COLUMN_PX);
            }
        }

        doc.width = width;
        doc.height = height;
        doc.render()
    }
}

/// Six corners at 60 degree steps, flat side up.
fn hexagon_points(cx: f32, cy: f32, r: f32) -> String {
    let mut points = Vec::with_capacity(6);
    for i in 0..6 {
        let angle = (i as f32 * 60.0).to_radians();
        points.push(format!("{},{}", cx + r * angle.cos(), cy + r * angle.sin()));
    }
    points.join(" ")
}

/// Summary plus commit date, capped at a readable line length.
fn description_text(node: &PlacedNode) -> String {
    let summary = truncate_columns(&node.summary, DESCRIPTION_COLUMNS);
    match Utc.timestamp_millis_opt(node.timestamp_ms).single() {
        Some(time) => format!("{summary} ({})", time.format("%Y-%m-%d")),
        None => summary,
    }
}

/// Cut `text` to at most `max` display columns, grapheme-aware.
fn truncate_columns(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > max {
            out.push('…');
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
