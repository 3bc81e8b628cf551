//! Layout serialization.

pub mod palette;
pub mod svg;

pub use palette::Palette;
pub use svg::SvgRenderer;
