use std::path::Path;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use git2::{ObjectType, Oid, Repository, Sort};
use tracing::debug;

use svgit_core::{CommitRecord, RefKind, RefRecord, StashRecord};

/// Read-only view of one repository, producing the plain records the
/// layout engine consumes.
pub struct GitSource {
    repo: Repository,
}

impl GitSource {
    /// Open `path`, or discover the repository from the environment.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let repo = match path {
            Some(path) => Repository::open(path),
            None => Repository::open_from_env(),
        }
        .context("failed to open repository")?;

        Ok(Self { repo })
    }

    /// Every commit reachable from the given references and stash entries,
    /// topological order, newest first. Walk roots are seeded per
    /// reference, so an excluded stash is simply never reached.
    pub fn commits(&self, refs: &[RefRecord], stashes: &[StashRecord]) -> Result<Vec<CommitRecord>> {
        let mut revwalk = self.repo.revwalk()?;
        for record in refs {
            if let Ok(oid) = Oid::from_str(&record.target_id) {
                revwalk.push(oid)?;
            }
        }
        for stash in stashes {
            if let Ok(oid) = Oid::from_str(&stash.target_id) {
                revwalk.push(oid)?;
            }
        }
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;

        let mut records = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            records.push(self.commit_to_record(&commit)?);
        }
        debug!(commits = records.len(), "walked repository");
        Ok(records)
    }

    fn commit_to_record(&self, commit: &git2::Commit) -> Result<CommitRecord> {
        let timestamp_ms = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .context("invalid commit timestamp")?
            .timestamp_millis();

        Ok(CommitRecord {
            id: commit.id().to_string(),
            parent_ids: commit.parent_ids().map(|oid| oid.to_string()).collect(),
            timestamp_ms,
            author: signature_string(&commit.author()),
            committer: signature_string(&commit.committer()),
            message: commit.message().unwrap_or("").to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
        })
    }

    /// Local branches, `origin/*` remote branches, and tags. Other remotes
    /// are ignored. Annotated tags are peeled to the commit they tag.
    pub fn references(&self) -> Result<Vec<RefRecord>> {
        let mut records = Vec::new();

        for branch in self.repo.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = branch?;
            if let (Some(name), Some(target)) = (branch.name()?, branch.get().target()) {
                debug!(name, target = %target, "branch");
                records.push(RefRecord::branch(name, &target.to_string()));
            }
        }

        for branch in self.repo.branches(Some(git2::BranchType::Remote))? {
            let (branch, _) = branch?;
            if let (Some(name), Some(target)) = (branch.name()?, branch.get().target()) {
                if !name.starts_with("origin/") {
                    debug!(name, "skipped remote");
                    continue;
                }
                debug!(name, target = %target, "remote branch");
                records.push(RefRecord::remote(name, &target.to_string()));
            }
        }

        // The foreach callback cannot fail, so collect raw entries first
        // and peel afterwards.
        let mut raw_tags: Vec<(Oid, Vec<u8>)> = Vec::new();
        self.repo.tag_foreach(|oid, name| {
            raw_tags.push((oid, name.to_vec()));
            true
        })?;
        for (oid, name) in raw_tags {
            let Ok(name) = std::str::from_utf8(&name) else {
                continue;
            };
            let name = name.strip_prefix("refs/tags/").unwrap_or(name);
            let object = self.repo.find_object(oid, None)?;
            let is_peeled_tag = object.kind() == Some(ObjectType::Tag);
            let Ok(commit) = object.peel_to_commit() else {
                debug!(name, "tag does not peel to a commit, skipped");
                continue;
            };
            debug!(name, target = %commit.id(), "tag");
            records.push(RefRecord::tag(name, &commit.id().to_string(), is_peeled_tag));
        }

        Ok(records)
    }

    /// Stash reflog entries, most recent first. The second parent of a
    /// stash commit is the saved index state.
    pub fn stashes(&mut self) -> Result<Vec<StashRecord>> {
        let mut raw: Vec<(usize, String, Oid)> = Vec::new();
        self.repo.stash_foreach(|index, message, oid| {
            raw.push((index, message.to_string(), *oid));
            true
        })?;

        let mut records = Vec::new();
        for (index, message, oid) in raw {
            let commit = self.repo.find_commit(oid)?;
            let index_parent_id = commit.parent_id(1).ok().map(|oid| oid.to_string());
            debug!(index, target = %oid, "stash");
            records.push(StashRecord {
                index,
                message,
                target_id: oid.to_string(),
                index_parent_id,
            });
        }
        Ok(records)
    }

    /// Name of the checked-out branch, if HEAD points at one.
    pub fn head_branch(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
            _ => Ok(None),
        }
    }
}

fn signature_string(sig: &git2::Signature) -> String {
    format!(
        "{} <{}>",
        sig.name().unwrap_or(""),
        sig.email().unwrap_or("")
    )
}
