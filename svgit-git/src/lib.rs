//! Git repository ingestion for the layout engine.

pub mod source;

pub use source::GitSource;
