use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use svgit_core::{pipeline, LayoutConfig, NodeShape, ReferenceSet, RenderOptions, SvgRenderer};
use svgit_git::GitSource;

#[derive(Parser)]
#[command(name = "svgit")]
#[command(about = "Render a git commit graph as an SVG lane diagram", long_about = None)]
struct Cli {
    /// Path to the repository
    #[arg(long, default_value = ".")]
    repository: PathBuf,

    /// Primary branch, drawn in the leftmost lane
    #[arg(long, default_value = "master")]
    primary: String,

    /// Use the checked-out branch as the primary branch
    #[arg(long)]
    head: bool,

    /// Render at most this many rows, newest first
    #[arg(long)]
    limit: Option<usize>,

    /// Include stash entries
    #[arg(long)]
    stashes: bool,

    /// Glyph drawn for each commit
    #[arg(long, value_enum, default_value_t = Shape::Hexagon)]
    shape: Shape,

    /// Grid cell size in pixels
    #[arg(long, default_value_t = 16.0)]
    size: f32,

    /// Stroke width in pixels
    #[arg(long, default_value_t = 2.0)]
    stroke_width: f32,

    /// Background color
    #[arg(long, default_value = "#333")]
    background: String,

    /// Text color
    #[arg(long, default_value = "#FFF")]
    text_color: String,

    /// Draw short-id labels in the left column
    #[arg(long)]
    labels: bool,

    /// Attach hover titles to commit glyphs
    #[arg(long)]
    titles: bool,

    /// Draw commit summaries beside each row
    #[arg(long)]
    descriptions: bool,

    /// Emit data attributes on commit glyphs
    #[arg(long)]
    data: bool,

    /// Print the computed layout as JSON instead of SVG
    #[arg(long)]
    json: bool,

    /// Output file name
    #[arg(long, default_value = "graph.svg")]
    filename: PathBuf,

    /// Print to stdout instead of saving (pass a single `-`)
    output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shape {
    Circle,
    Hexagon,
}

impl From<Shape> for NodeShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Circle => NodeShape::Circle,
            Shape::Hexagon => NodeShape::Hexagon,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut source = GitSource::open(Some(&cli.repository))?;

    let primary = if cli.head {
        source.head_branch()?.unwrap_or_else(|| cli.primary.clone())
    } else {
        cli.primary.clone()
    };

    let config = LayoutConfig {
        primary_branch: primary,
        include_stashes: cli.stashes,
        cell_size: cli.size,
        row_limit: cli.limit,
        ..LayoutConfig::default()
    };
    let options = RenderOptions {
        shape: cli.shape.into(),
        stroke_width: cli.stroke_width,
        background: cli.background.clone(),
        text_color: cli.text_color.clone(),
        labels: cli.labels,
        titles: cli.titles,
        descriptions: cli.descriptions,
        data_attributes: cli.data,
    };
    // Reject bad settings before touching the repository
    config.validate()?;
    let renderer = SvgRenderer::new(options)?;

    let stashes = if cli.stashes {
        source.stashes()?
    } else {
        Vec::new()
    };
    let refs = source.references()?;
    let commits = source.commits(&refs, &stashes)?;
    let reference_set =
        ReferenceSet::from_records(&config.primary_branch, &refs, &stashes, cli.stashes);

    let layout = pipeline::compute(commits, &reference_set, &config)?;
    debug!(
        nodes = layout.nodes.len(),
        lanes = layout.lane_count,
        "layout ready"
    );

    let output = if cli.json {
        serde_json::to_string_pretty(&layout).context("failed to serialize layout")?
    } else {
        renderer.render(&layout)
    };

    if cli.output.as_deref() == Some("-") {
        println!("{output}");
    } else {
        fs::write(&cli.filename, &output)
            .with_context(|| format!("failed to write {}", cli.filename.display()))?;
        debug!(file = %cli.filename.display(), bytes = output.len(), "saved");
    }

    Ok(())
}
