use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Named URLs extracted from the pull request object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    pub url: String,
    pub html_url: String,
    pub diff_url: String,
    pub patch_url: String,
}

/// Labels assigned to a record, shaped by the active policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssignedLabels {
    /// Exactly one label (single-label, first-match policy)
    Single(String),
    /// Zero or more deduplicated labels (multi-label policy)
    Multi(Vec<String>),
}

impl AssignedLabels {
    /// All label names involved, regardless of policy
    pub fn names(&self) -> Vec<&str> {
        match self {
            AssignedLabels::Single(label) => vec![label.as_str()],
            AssignedLabels::Multi(labels) => labels.iter().map(String::as_str).collect(),
        }
    }

    /// Whether the given label was assigned
    pub fn contains(&self, label: &str) -> bool {
        match self {
            AssignedLabels::Single(l) => l == label,
            AssignedLabels::Multi(labels) => labels.iter().any(|l| l == label),
        }
    }

    /// Render as a single table cell ("; "-joined under the multi-label policy)
    pub fn joined(&self) -> String {
        match self {
            AssignedLabels::Single(label) => label.clone(),
            AssignedLabels::Multi(labels) => labels.join("; "),
        }
    }
}

/// One normalized, classified pull request event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub author: String,
    pub title: String,
    pub body: String,
    /// Normalized state text; outcome aggregation only recognizes "open" and "closed"
    pub state: String,
    pub merged: Option<bool>,
    /// Source timestamp string, passed through untouched
    pub created_at: String,
    pub commits: Option<u64>,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub changed_files: Option<u64>,
    pub milestone: String,
    pub reviewers: String,
    pub assignees: String,
    pub mergeable_state: String,
    pub merge_commit_sha: String,
    pub draft: String,
    pub links: Links,
    pub labels: AssignedLabels,
}

/// Internal representation of a discovered source CSV file
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    pub relative_path: String,
}
