//! Branch color assignment.

use std::collections::HashMap;

/// Material palette the diagrams draw from, in assignment order.
pub const COLORS: [&str; 48] = [
    "#D50000", "#C51162", "#AA00FF", "#6200EA", "#304FFE", "#2962FF",
    "#0091EA", "#00B8D4", "#00BFA5", "#00C853", "#64DD17", "#AEEA00",
    "#FFD600", "#FFAB00", "#FF6D00", "#DD2C00",

    "#FF1744", "#F50057", "#D500F9", "#651FFF", "#3D5AFE", "#2979FF",
    "#00B0FF", "#00E5FF", "#1DE9B6", "#00E676", "#76FF03", "#C6FF00",
    "#FFEA00", "#FFC400", "#FF9100", "#FF3D00",

    "#FF5252", "#FF4081", "#E040FB", "#7C4DFF", "#536DFE", "#448AFF",
    "#40C4FF", "#18FFFF", "#64FFDA", "#69F0AE", "#B2FF59", "#EEFF41",
    "#FFFF00", "#FFD740", "#FFAB40", "#FF6E40",
];

/// Color reserved for the primary branch.
const PRIMARY_COLOR: &str = "#2979FF";

/// Hands each branch a stable color: the primary is pinned, everything else
/// walks the palette in order and wraps around.
#[derive(Debug)]
pub struct Palette {
    assigned: HashMap<String, &'static str>,
    cursor: usize,
}

impl Palette {
    pub fn new(primary: &str) -> Self {
        let mut assigned = HashMap::new();
        assigned.insert(primary.to_string(), PRIMARY_COLOR);
        let pinned = COLORS.iter().position(|&c| c == PRIMARY_COLOR).unwrap_or(0);
        Self {
            assigned,
            cursor: pinned + 1,
        }
    }

    pub fn color(&mut self, branch: &str) -> &'static str {
        if let Some(&color) = self.assigned.get(branch) {
            return color;
        }
        let color = COLORS[self.cursor % COLORS.len()];
        self.cursor += 1;
        self.assigned.insert(branch.to_string(), color);
        color
    }
}
