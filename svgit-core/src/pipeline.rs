//! One-call driver for the layout sequence.

use tracing::debug;

use crate::config::{ConfigError, LayoutConfig};
use crate::core::CommitGraph;
use crate::input::{CommitRecord, ReferenceSet};
use crate::lineage::LineageAssigner;
use crate::order::drawing_order;
use crate::project::{Layout, LayoutProjector};

/// Build the graph, assign lineages, order, and place. Each phase finishes
/// the whole node set before the next starts. Configuration is rejected
/// up front, before any graph work happens.
pub fn compute(
    records: Vec<CommitRecord>,
    refs: &ReferenceSet,
    config: &LayoutConfig,
) -> Result<Layout, ConfigError> {
    config.validate()?;

    debug!(records = records.len(), primary = config.primary_branch.as_str(), "computing layout");
    let mut graph = CommitGraph::from_records(records);
    let mut assigner = LineageAssigner::new(&config.primary_branch);
    assigner.assign_references(&mut graph, refs);
    let order = drawing_order(&mut graph, &mut assigner);
    let initial = assigner.initial();
    Ok(LayoutProjector::new(config).run(&mut graph, &order, initial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{RefRecord, StashRecord};

    fn record(id: &str, parents: &[&str], timestamp_ms: i64) -> CommitRecord {
        CommitRecord {
            id: id.to_string(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            timestamp_ms,
            author: "a <a@example.com>".to_string(),
            committer: "a <a@example.com>".to_string(),
            message: format!("commit {id}"),
            summary: format!("commit {id}"),
        }
    }

    #[test]
    fn invalid_config_fails_before_any_layout() {
        let config = LayoutConfig {
            cell_size: -4.0,
            ..LayoutConfig::default()
        };
        let refs = ReferenceSet::from_records("master", &[], &[], false);
        let result = compute(vec![record("aaa", &[], 1000)], &refs, &config);
        assert_eq!(result.unwrap_err(), ConfigError::InvalidCellSize(-4.0));
    }

    #[test]
    fn two_branch_tips_on_one_commit_share_a_lane() {
        let records = vec![
            record("bbb", &["aaa"], 2000),
            record("aaa", &[], 1000),
        ];
        let refs = ReferenceSet::from_records(
            "master",
            &[
                RefRecord::branch("master", "bbb"),
                RefRecord::branch("alias", "bbb"),
            ],
            &[],
            false,
        );
        let layout = compute(records, &refs, &LayoutConfig::default()).unwrap();
        // the primary claims the commit, the alias brands nothing
        assert_eq!(layout.lane_count, 1);
        assert!(layout.nodes.iter().all(|n| n.branch == "master"));
    }

    #[test]
    fn primary_lineage_holds_lane_zero_to_the_top() {
        let records = vec![
            record("top", &["merge"], 6000),
            record("merge", &["mmm", "fff"], 5000),
            record("fff", &["aaa"], 4000),
            record("mmm", &["aaa"], 3000),
            record("aaa", &[], 1000),
        ];
        let refs = ReferenceSet::from_records(
            "master",
            &[
                RefRecord::branch("master", "top"),
                RefRecord::branch("feature", "fff"),
            ],
            &[],
            false,
        );
        let layout = compute(records, &refs, &LayoutConfig::default()).unwrap();
        for node in layout.nodes.iter().filter(|n| n.branch == "master") {
            assert_eq!(node.lane, 0, "{} strayed off lane 0", node.id);
        }
    }

    #[test]
    fn unreferenced_commits_get_synthetic_lineages() {
        let records = vec![
            record("bbb", &["aaa"], 2000),
            record("aaa", &[], 1000),
            record("zzz", &["yyy"], 4000),
            record("yyy", &[], 3000),
        ];
        let refs = ReferenceSet::from_records(
            "master",
            &[RefRecord::branch("master", "bbb")],
            &[],
            false,
        );
        let layout = compute(records, &refs, &LayoutConfig::default()).unwrap();
        let yyy = layout.nodes.iter().find(|n| n.id == "yyy").unwrap();
        let zzz = layout.nodes.iter().find(|n| n.id == "zzz").unwrap();
        assert_eq!(yyy.branch, "~1");
        assert_eq!(zzz.branch, "~1");
        assert!(yyy.lane > 0);
        assert_eq!(yyy.lane, zzz.lane);
    }

    #[test]
    fn stash_nodes_are_flagged_and_connected() {
        let records = vec![
            record("stash", &["bbb", "idx"], 4000),
            record("idx", &["bbb"], 4000),
            record("bbb", &["aaa"], 2000),
            record("aaa", &[], 1000),
        ];
        let stashes = vec![StashRecord {
            index: 0,
            message: "WIP on master".to_string(),
            target_id: "stash".to_string(),
            index_parent_id: Some("idx".to_string()),
        }];
        let refs = ReferenceSet::from_records(
            "master",
            &[RefRecord::branch("master", "bbb")],
            &stashes,
            true,
        );
        let config = LayoutConfig {
            include_stashes: true,
            ..LayoutConfig::default()
        };
        let layout = compute(records, &refs, &config).unwrap();
        let stash = layout.nodes.iter().find(|n| n.id == "stash").unwrap();
        assert!(stash.is_stash);
        assert_eq!(stash.branch, "stash@{0}");
        assert!(layout
            .edges
            .iter()
            .any(|e| e.is_stash), "no stash-styled edge found");
    }

    #[test]
    fn rows_stay_dense_from_zero() {
        let records = vec![
            record("ddd", &["bbb"], 4000),
            record("ccc", &["bbb"], 3000),
            record("bbb", &["aaa"], 2000),
            record("aaa", &[], 1000),
        ];
        let refs = ReferenceSet::from_records(
            "master",
            &[
                RefRecord::branch("master", "ddd"),
                RefRecord::branch("side", "ccc"),
            ],
            &[],
            false,
        );
        let layout = compute(records, &refs, &LayoutConfig::default()).unwrap();
        let mut rows: Vec<usize> = layout.nodes.iter().map(|n| n.row).collect();
        rows.sort_unstable();
        assert_eq!(rows, vec![0, 1, 2, 3]);
    }
}
