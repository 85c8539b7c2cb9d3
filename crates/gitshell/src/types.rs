//! Pure data types for working-copy operations.

use serde::{Deserialize, Serialize};

/// How a path changed between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl ChangeKind {
    /// Maps a `git diff --name-status` code. Rename, copy and type-change
    /// codes have no mapping.
    pub fn from_status_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(ChangeKind::Added),
            "M" => Some(ChangeKind::Modified),
            "D" => Some(ChangeKind::Deleted),
            _ => None,
        }
    }
}

/// One entry of a diff summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Kind of change.
    pub change_kind: ChangeKind,
    /// Repository-relative path.
    pub path: String,
}

impl ChangeRecord {
    pub fn new(change_kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            change_kind,
            path: path.into(),
        }
    }
}

/// Options consumed when opening or pulling a working copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepoOptions {
    /// Pass `--rebase` to an explicit [`pull`](crate::Repository::pull).
    pub rebase_on_pull: bool,
    /// Directory name under the parent directory. Defaults to the short
    /// name derived from the URL.
    pub clone_dir: Option<String>,
}

impl RepoOptions {
    /// Enables rebasing on pull.
    pub fn rebase(mut self) -> Self {
        self.rebase_on_pull = true;
        self
    }

    /// Overrides the clone directory name.
    pub fn clone_dir(mut self, name: impl Into<String>) -> Self {
        self.clone_dir = Some(name.into());
        self
    }
}
