//! Plain input records handed to the layout engine.
//!
//! Everything here is collaborator-agnostic: a git backend, a fixture
//! builder, or a deserializer can produce these records.

use serde::{Deserialize, Serialize};

/// One commit as reported by the history source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full content hash.
    pub id: String,
    /// Parent ids in recorded order; the first entry is the primary parent.
    pub parent_ids: Vec<String>,
    /// Commit time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    pub author: String,
    pub committer: String,
    /// Full commit message.
    pub message: String,
    /// First line of the message.
    pub summary: String,
}

/// Kind of a named reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefKind {
    Branch,
    RemoteBranch,
    Tag,
    Stash,
}

/// One named reference pointing at a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefRecord {
    pub name: String,
    pub kind: RefKind,
    /// Id of the commit the reference resolves to.
    pub target_id: String,
    /// True when the target was reached by peeling an annotated tag.
    pub is_peeled_tag: bool,
}

impl RefRecord {
    pub fn branch(name: &str, target_id: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: RefKind::Branch,
            target_id: target_id.to_string(),
            is_peeled_tag: false,
        }
    }

    pub fn remote(name: &str, target_id: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: RefKind::RemoteBranch,
            target_id: target_id.to_string(),
            is_peeled_tag: false,
        }
    }

    pub fn tag(name: &str, target_id: &str, is_peeled_tag: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: RefKind::Tag,
            target_id: target_id.to_string(),
            is_peeled_tag,
        }
    }
}

/// One stash reflog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashRecord {
    /// Position in the stash reflog, 0 is the most recent.
    pub index: usize,
    pub message: String,
    /// The stash commit itself.
    pub target_id: String,
    /// Second parent of the stash commit, the saved index state.
    pub index_parent_id: Option<String>,
}

/// One stash entry promoted to a walkable reference, named `stash@{n}`.
#[derive(Debug, Clone)]
pub struct StashEntry {
    pub name: String,
    pub target_id: String,
    pub index_parent_id: Option<String>,
}

/// References bucketed into lineage processing order.
///
/// Local branches come first with the primary branch hoisted to the front,
/// then remote branches, then tags (labels only), then stash entries.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    pub primary: String,
    /// `(name, target id)` pairs.
    pub branches: Vec<(String, String)>,
    pub remote_branches: Vec<(String, String)>,
    pub tags: Vec<(String, String)>,
    pub stashes: Vec<StashEntry>,
}

impl ReferenceSet {
    /// Bucket raw records. Stash entries are dropped entirely unless
    /// `include_stashes` is set, so excluded stashes never influence the
    /// graph.
    pub fn from_records(
        primary: &str,
        refs: &[RefRecord],
        stashes: &[StashRecord],
        include_stashes: bool,
    ) -> Self {
        let mut set = ReferenceSet {
            primary: primary.to_string(),
            ..Default::default()
        };
        for record in refs {
            let pair = (record.name.clone(), record.target_id.clone());
            match record.kind {
                RefKind::Branch => {
                    if record.name == primary {
                        set.branches.insert(0, pair);
                    } else {
                        set.branches.push(pair);
                    }
                }
                RefKind::RemoteBranch => set.remote_branches.push(pair),
                RefKind::Tag => set.tags.push(pair),
                // Stashes arrive through the reflog records below.
                RefKind::Stash => {}
            }
        }
        if include_stashes {
            for stash in stashes {
                set.stashes.push(StashEntry {
                    name: format!("stash@{{{}}}", stash.index),
                    target_id: stash.target_id.clone(),
                    index_parent_id: stash.index_parent_id.clone(),
                });
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_branch_is_hoisted_first() {
        let refs = vec![
            RefRecord::branch("develop", "aaa"),
            RefRecord::branch("master", "bbb"),
            RefRecord::branch("feature", "ccc"),
        ];
        let set = ReferenceSet::from_records("master", &refs, &[], false);
        let names: Vec<&str> = set.branches.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["master", "develop", "feature"]);
    }

    #[test]
    fn records_are_bucketed_by_kind() {
        let refs = vec![
            RefRecord::branch("master", "aaa"),
            RefRecord::remote("origin/master", "aaa"),
            RefRecord::tag("v1.0", "bbb", true),
        ];
        let set = ReferenceSet::from_records("master", &refs, &[], false);
        assert_eq!(set.branches.len(), 1);
        assert_eq!(set.remote_branches.len(), 1);
        assert_eq!(set.tags.len(), 1);
        assert_eq!(set.tags[0].0, "v1.0");
    }

    #[test]
    fn stash_entries_are_named_by_reflog_index() {
        let stashes = vec![
            StashRecord {
                index: 0,
                message: "WIP on master".to_string(),
                target_id: "ddd".to_string(),
                index_parent_id: Some("eee".to_string()),
            },
            StashRecord {
                index: 1,
                message: "WIP on feature".to_string(),
                target_id: "fff".to_string(),
                index_parent_id: None,
            },
        ];
        let set = ReferenceSet::from_records("master", &[], &stashes, true);
        assert_eq!(set.stashes.len(), 2);
        assert_eq!(set.stashes[0].name, "stash@{0}");
        assert_eq!(set.stashes[1].name, "stash@{1}");
    }

    #[test]
    fn excluded_stashes_leave_no_trace() {
        let stashes = vec![StashRecord {
            index: 0,
            message: "WIP".to_string(),
            target_id: "ddd".to_string(),
            index_parent_id: None,
        }];
        let set = ReferenceSet::from_records("master", &[], &stashes, false);
        assert!(set.stashes.is_empty());
    }
}
