//! Git output parsing helpers.
//!
//! Each function understands exactly one human-readable git output format.
//! They are coupled to git's phrasing, so changes in that phrasing should
//! only ever need a fix here.

use crate::types::{ChangeKind, ChangeRecord};

/// Phrasings git has used for "branch is level with its upstream".
const UP_TO_DATE_MARKERS: &[&str] = &["up-to-date", "up to date"];

/// Phrasings git has used for "no uncommitted changes".
const NOTHING_TO_COMMIT_MARKERS: &[&str] = &["working directory clean", "working tree clean"];

/// Derives the short repository name from its URL: the last `/` segment
/// with a trailing `.git` removed. Returns `None` for an empty segment.
pub fn short_name_from_url(url: &str) -> Option<&str> {
    let segment = url.rsplit('/').next().unwrap_or(url);
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Extracts the checked-out branch from `git branch` output: the text after
/// the two-character `* ` marker on the first line starting with `*`.
pub fn parse_current_branch(output: &str) -> Option<&str> {
    output
        .split('\n')
        .find(|line| line.starts_with('*'))
        .map(|line| line.get(2..).unwrap_or(""))
}

/// Strips a single trailing newline from `git rev-parse` output.
pub fn trim_commit_id(output: &str) -> &str {
    output.strip_suffix('\n').unwrap_or(output)
}

/// Parses `git diff --name-status` output. Lines that are not exactly
/// `<code> <path>` or whose code has no [`ChangeKind`] are skipped.
pub fn parse_diff_status(output: &str) -> Vec<ChangeRecord> {
    let mut records = Vec::new();
    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            continue;
        }
        if let Some(kind) = ChangeKind::from_status_code(fields[0]) {
            records.push(ChangeRecord::new(kind, fields[1]));
        }
    }
    records
}

/// Collects commit ids from `git log` output, in output order. A commit
/// boundary is a line starting with `commit`; the id is everything after
/// its first space.
pub fn log_commit_ids(output: &str) -> Vec<&str> {
    output
        .lines()
        .filter(|line| line.starts_with("commit"))
        .map(|line| match line.find(' ') {
            Some(idx) => &line[idx + 1..],
            None => "",
        })
        .collect()
}

/// Returns true when `git status` output reports both an up-to-date branch
/// and nothing to commit.
pub fn is_clean_status(output: &str) -> bool {
    UP_TO_DATE_MARKERS.iter().any(|m| output.contains(m))
        && NOTHING_TO_COMMIT_MARKERS.iter().any(|m| output.contains(m))
}
