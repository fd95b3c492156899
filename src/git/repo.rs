use crate::error::{MigkitError, Result};
use crate::model::{ChangeKind, ChangeRecord};
use chrono::{DateTime, Utc};
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or discover one from the current dir
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn folder_exists(&self, folder: &str) -> bool {
        self.path.join(folder).is_dir()
    }

    /// Short name of the currently checked-out branch, if any.
    pub fn branch_name(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        head.referent_name().map(|name| name.shorten().to_string())
    }

    /// Configured `user.name`, if set.
    pub fn user_name(&self) -> Option<String> {
        self.repo
            .config_snapshot()
            .string("user.name")
            .map(|v| v.to_string())
    }

    /// Walk the full history from HEAD and produce one record per
    /// (commit, file, folder) triple for files under any of `folders`.
    ///
    /// Merge commits are diffed against their first parent; the root
    /// commit against the empty tree. Renames and copies carry no
    /// recognized change kind and are skipped.
    pub fn collect_history(&self, folders: &[String]) -> Result<Vec<ChangeRecord>> {
        let mut head = self.repo.head()?;
        let head_commit = match head.peel_to_commit_in_place() {
            Ok(commit) => commit,
            // Unborn HEAD: a repository with no commits has no history.
            Err(_) => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Collecting history...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp: DateTime<Utc> = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| MigkitError::InvalidDate(format!("Invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            let author = commit.author()?;
            let author_name = author.name.to_string();
            let author_email = author.email.to_string();
            let message = commit.message()?.title.to_string();

            let commit_tree = commit.tree()?;
            let changes: Vec<ChangeDetached> = if let Some(parent_id) = parents.first() {
                let parent_tree = self.repo.find_commit(*parent_id)?.tree()?;
                self.repo
                    .diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            } else {
                self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?
            };

            for change in changes {
                let (kind, location) = match &change {
                    ChangeDetached::Addition { location, .. } => (ChangeKind::Added, location),
                    ChangeDetached::Modification { location, .. } => {
                        (ChangeKind::Modified, location)
                    }
                    ChangeDetached::Deletion { location, .. } => (ChangeKind::Deleted, location),
                    ChangeDetached::Rewrite { .. } => continue,
                };
                let path = location.to_string();

                for folder in folders {
                    if !folder_contains(folder, &path) {
                        continue;
                    }
                    records.push(ChangeRecord {
                        folder: folder.clone(),
                        author: author_name.clone(),
                        email: author_email.clone(),
                        timestamp,
                        kind,
                        path: path.clone(),
                        commit_id: commit_id.to_string(),
                        message: message.clone(),
                    });
                }
            }

            for pid in parents {
                stack.push_back(pid);
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(records)
    }
}

/// Prefix match on whole path segments: folder `Scripts` contains
/// `Scripts/001.sql` but not `Scripts2/001.sql`.
fn folder_contains(folder: &str, path: &str) -> bool {
    let folder = folder.trim_end_matches('/');
    path.strip_prefix(folder)
        .is_some_and(|rest| rest.starts_with('/'))
}
