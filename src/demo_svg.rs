use svgit_core::{
    pipeline, CommitGraph, CommitRecord, LayoutConfig, RefRecord, ReferenceSet, RenderOptions,
    SvgRenderer,
};

fn record(id: &str, parents: &[&str], timestamp_ms: i64, summary: &str) -> CommitRecord {
    CommitRecord {
        id: id.to_string(),
        parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        timestamp_ms,
        author: "Demo Author <demo@example.com>".to_string(),
        committer: "Demo Author <demo@example.com>".to_string(),
        message: summary.to_string(),
        summary: summary.to_string(),
    }
}

fn demo_history() -> Vec<CommitRecord> {
    // master with one merged feature branch and a tagged release
    vec![
        record("f0e1d2c3", &["d4c5b6a7", "90817263"], 5000, "Merge feature work"),
        record("90817263", &["a1b2c3d4"], 4000, "Teach the parser new tricks"),
        record("d4c5b6a7", &["a1b2c3d4"], 3000, "Fix release packaging"),
        record("a1b2c3d4", &["00112233"], 2000, "Wire up the build"),
        record("00112233", &[], 1000, "Initial commit"),
    ]
}

fn main() {
    println!("svgit layout demo");
    println!("=================\n");

    let records = demo_history();
    let refs = ReferenceSet::from_records(
        "master",
        &[
            RefRecord::branch("master", "f0e1d2c3"),
            RefRecord::branch("feature", "90817263"),
            RefRecord::tag("v0.1.0", "d4c5b6a7", false),
        ],
        &[],
        false,
    );

    println!("History statistics:");
    let stats = CommitGraph::from_records(records.clone()).stats();
    println!("  Total commits: {}", stats.commits);
    println!("  Merge commits: {}", stats.merges);
    println!("  Root commits: {}", stats.roots);
    println!();

    let layout = match pipeline::compute(records, &refs, &LayoutConfig::default()) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("Error computing layout: {}", e);
            return;
        }
    };

    println!("Lanes used: {}", layout.lane_count);
    for node in &layout.nodes {
        println!(
            "  {} [{}] lane {} row {}",
            node.short_id, node.branch, node.lane, node.row
        );
    }
    println!();

    let options = RenderOptions {
        labels: true,
        titles: true,
        ..RenderOptions::default()
    };
    let renderer = match SvgRenderer::new(options) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Error configuring renderer: {}", e);
            return;
        }
    };

    println!("SVG:");
    println!("────");
    println!("{}", renderer.render(&layout));
}
