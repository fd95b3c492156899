use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// Kind of change a commit made to a tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Added => "Added",
            ChangeKind::Modified => "Modified",
            ChangeKind::Deleted => "Deleted",
        };
        f.write_str(s)
    }
}

/// One (commit, file) observation under a tracked folder.
///
/// The author field is rewritten to its canonical form before
/// aggregation; every other field keeps the raw git metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub folder: String,
    pub author: String,
    pub email: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ChangeKind,
    pub path: String,
    pub commit_id: String,
    pub message: String,
}

/// Operation reported by the schema engine for one detected difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffChangeKind {
    Add,
    Edit,
    Delete,
}

impl DiffChangeKind {
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("add") {
            Some(DiffChangeKind::Add)
        } else if s.eq_ignore_ascii_case("edit") {
            Some(DiffChangeKind::Edit)
        } else if s.eq_ignore_ascii_case("delete") {
            Some(DiffChangeKind::Delete)
        } else {
            None
        }
    }
}

impl fmt::Display for DiffChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiffChangeKind::Add => "Add",
            DiffChangeKind::Edit => "Edit",
            DiffChangeKind::Delete => "Delete",
        };
        f.write_str(s)
    }
}

/// One row of the schema engine's diff table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffChange {
    pub id: String,
    pub kind: DiffChangeKind,
    pub object_type: String,
    pub schema: String,
    pub name: String,
}

impl DiffChange {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorStats {
    pub author: String,
    pub records: usize,
    pub commits: usize,
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderStats {
    pub folder: String,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub total_records: usize,
    pub author_count: usize,
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub by_author: Vec<AuthorStats>,
    pub by_folder: Vec<FolderStats>,
    pub recent: Vec<ChangeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub folders: Vec<String>,
    pub skipped_folders: Vec<String>,
    pub report: AuditReport,
    pub records: Vec<ChangeRecord>,
}
