use crate::aggregate::{AggregateCounts, OutcomeShares};
use crate::error::Result;
use crate::types::PullRequestRecord;
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::path::Path;

/// Fixed output column set, declared once per run so a batch with zero
/// qualifying rows still writes the same header
pub const RECORD_COLUMNS: &[&str] = &[
    "Title",
    "Pull Request Number",
    "State",
    "Merged",
    "Author",
    "Body",
    "Created At",
    "Commits",
    "Additions",
    "Deletions",
    "Changed Files",
    "Milestone",
    "Reviewers",
    "Assignees",
    "Mergeable State",
    "Merge Commit SHA",
    "Draft",
    "URL",
    "HTML URL",
    "Diff URL",
    "Patch URL",
    "Labels",
];

/// Write the record table as CSV, links flattened to one column per URL
pub fn write_records_csv(path: &Path, records: &[PullRequestRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(RECORD_COLUMNS)?;
    for record in records {
        writer.write_record(record_row(record))?;
    }
    writer.flush()?;
    Ok(())
}

fn record_row(record: &PullRequestRecord) -> Vec<String> {
    vec![
        record.title.clone(),
        record.number.to_string(),
        record.state.clone(),
        opt_bool(record.merged),
        record.author.clone(),
        record.body.clone(),
        record.created_at.clone(),
        opt_u64(record.commits),
        opt_u64(record.additions),
        opt_u64(record.deletions),
        opt_u64(record.changed_files),
        record.milestone.clone(),
        record.reviewers.clone(),
        record.assignees.clone(),
        record.mergeable_state.clone(),
        record.merge_commit_sha.clone(),
        record.draft.clone(),
        record.links.url.clone(),
        record.links.html_url.clone(),
        record.links.diff_url.clone(),
        record.links.patch_url.clone(),
        record.labels.joined(),
    ]
}

fn opt_u64(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_bool(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render the per-label outcome summary as console text
pub fn render_summary(
    counts: &AggregateCounts,
    shares: &IndexMap<String, OutcomeShares>,
) -> String {
    let mut out = String::new();
    out.push_str("Percentage of pull requests for each label and state:\n");

    for (label, share) in shares {
        let tally = counts.get(label).copied().unwrap_or_default();
        let _ = writeln!(out, "{}:", label);
        let _ = writeln!(
            out,
            "  Accepted: {} pull requests ({:.2}%)",
            tally.accepted, share.accepted_pct
        );
        let _ = writeln!(
            out,
            "  Rejected: {} pull requests ({:.2}%)",
            tally.rejected, share.rejected_pct
        );
        let _ = writeln!(
            out,
            "  Still Open: {} pull requests ({:.2}%)",
            tally.still_open, share.still_open_pct
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateCounts;
    use crate::taxonomy::Taxonomy;
    use crate::types::{AssignedLabels, Links};

    fn record() -> PullRequestRecord {
        PullRequestRecord {
            number: 42,
            author: "alice".to_string(),
            title: "Upgrade Docker base image".to_string(),
            body: "Critical fix".to_string(),
            state: "closed".to_string(),
            merged: Some(true),
            created_at: "2015-01-01T19:00:00Z".to_string(),
            commits: Some(1),
            additions: Some(5),
            deletions: None,
            changed_files: Some(1),
            milestone: String::new(),
            reviewers: String::new(),
            assignees: String::new(),
            mergeable_state: String::new(),
            merge_commit_sha: String::new(),
            draft: String::new(),
            links: Links {
                url: "https://api.example.com/pulls/42".to_string(),
                ..Links::default()
            },
            labels: AssignedLabels::Multi(vec![
                "Major Docker Image Upgrade".to_string(),
                "Storage Issue Fix".to_string(),
            ]),
        }
    }

    #[test]
    fn test_row_matches_header_width() {
        assert_eq!(record_row(&record()).len(), RECORD_COLUMNS.len());
    }

    #[test]
    fn test_labels_joined_and_merged_rendered() {
        let row = record_row(&record());
        assert!(row.contains(&"Major Docker Image Upgrade; Storage Issue Fix".to_string()));
        assert!(row.contains(&"true".to_string()));
        // Absent numerics render as empty cells, not zeros
        assert!(row.iter().any(|cell| cell.is_empty()));
    }

    #[test]
    fn test_empty_batch_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records_csv(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Title,"));
        assert!(header.ends_with(",Labels"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_summary_lists_every_label() {
        let counts = AggregateCounts::new(&Taxonomy::default());
        let shares = counts.finalize();
        let summary = render_summary(&counts, &shares);
        assert!(summary.contains("Major Docker Image Upgrade:"));
        assert!(summary.contains("Uncategorized:"));
        assert!(summary.contains("Accepted: 0 pull requests (0.00%)"));
    }
}
