use crate::classify::LabelClassifier;
use crate::config::{Config, RelevanceScope};
use crate::error::Result;
use crate::normalize::TextNormalizer;
use crate::taxonomy::Taxonomy;
use crate::types::{Links, PullRequestRecord};
use serde_json::Value;

/// Turns one raw `payload` string into a normalized, classified record.
///
/// Extraction is pure: a row that fails to parse, lacks a `pull_request`
/// object, or fails the relevance filter yields `None`, never an error, and
/// no shared state is touched.
#[derive(Debug)]
pub struct RecordExtractor {
    normalizer: TextNormalizer,
    classifier: LabelClassifier,
    relevance: RelevanceScope,
    rewrap_width: Option<usize>,
}

impl RecordExtractor {
    /// Create an extractor over the default taxonomy
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_taxonomy(config, Taxonomy::default())
    }

    /// Create an extractor over a substituted taxonomy
    pub fn with_taxonomy(config: &Config, taxonomy: Taxonomy) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new(config.rewrap_width.is_some())?,
            classifier: LabelClassifier::new(taxonomy, config.policy)?,
            relevance: config.relevance,
            rewrap_width: config.rewrap_width,
        })
    }

    /// Extract a record from a raw payload string, or `None` for rows that
    /// are malformed, lack a pull request, or are irrelevant
    pub fn extract(&self, payload: &str) -> Option<PullRequestRecord> {
        let data: Value = serde_json::from_str(payload).ok()?;
        let pr = data.get("pull_request").filter(|v| v.is_object())?;

        let title = str_field(pr, "title");
        let body = str_field(pr, "body");
        let comments: Vec<&str> = data
            .get("comments")
            .and_then(Value::as_array)
            .map(|comments| {
                comments
                    .iter()
                    .filter_map(|comment| comment.get("body").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        let full_text = format!("{}\n{}\n{}", title, body, comments.join(" "));

        let relevant = match self.relevance {
            RelevanceScope::Off => true,
            RelevanceScope::BodyOnly => contains_docker_token(body),
            RelevanceScope::FullText => contains_docker_token(&full_text),
        };
        if !relevant {
            return None;
        }

        let labels = self
            .classifier
            .classify(&self.normalizer.normalize(Some(&full_text)));

        Some(PullRequestRecord {
            number: pr.get("number").and_then(Value::as_u64).unwrap_or(0),
            author: self.normalizer.normalize(
                pr.get("user")
                    .and_then(|user| user.get("login"))
                    .and_then(Value::as_str),
            ),
            title: self
                .normalizer
                .normalize_wrapped(Some(title), self.rewrap_width),
            body: self
                .normalizer
                .normalize_wrapped(Some(body), self.rewrap_width),
            state: self.normalizer.normalize(pr.get("state").and_then(Value::as_str)),
            merged: pr.get("merged").and_then(Value::as_bool),
            created_at: str_field(pr, "created_at").to_string(),
            commits: pr.get("commits").and_then(Value::as_u64),
            additions: pr.get("additions").and_then(Value::as_u64),
            deletions: pr.get("deletions").and_then(Value::as_u64),
            changed_files: pr.get("changed_files").and_then(Value::as_u64),
            milestone: self.normalizer.normalize(
                pr.get("milestone")
                    .and_then(|milestone| milestone.get("title"))
                    .and_then(Value::as_str),
            ),
            reviewers: self
                .normalizer
                .normalize(Some(&join_logins(pr, "requested_reviewers"))),
            assignees: self.normalizer.normalize(Some(&join_logins(pr, "assignees"))),
            mergeable_state: self
                .normalizer
                .normalize(pr.get("mergeable_state").and_then(Value::as_str)),
            merge_commit_sha: self
                .normalizer
                .normalize(pr.get("merge_commit_sha").and_then(Value::as_str)),
            draft: pr
                .get("draft")
                .and_then(Value::as_bool)
                .map(|draft| draft.to_string())
                .unwrap_or_default(),
            links: Links {
                url: str_field(pr, "url").to_string(),
                html_url: str_field(pr, "html_url").to_string(),
                diff_url: str_field(pr, "diff_url").to_string(),
                patch_url: str_field(pr, "patch_url").to_string(),
            },
            labels,
        })
    }
}

/// String field with an empty default for missing or non-string keys
fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Join user logins from an array field ("requested_reviewers", "assignees")
fn join_logins(pr: &Value, key: &str) -> String {
    pr.get(key)
        .and_then(Value::as_array)
        .map(|users| {
            users
                .iter()
                .filter_map(|user| user.get("login").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// Case-insensitive test for a Docker-related token ("docker" covers
/// "dockerfile" and every case variant)
fn contains_docker_token(text: &str) -> bool {
    text.to_lowercase().contains("docker")
}
