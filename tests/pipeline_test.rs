use prbot::export;
use prbot::prelude::*;
use std::path::Path;

const CRITICAL_DOCKER_PAYLOAD: &str = r#"{"pull_request": {
    "title": "Upgrade Docker base image to latest - critical",
    "body": "Critical security vulnerabilities found. Updating to alpine:latest.",
    "number": 42,
    "state": "closed",
    "merged": true,
    "user": {"login": "alice"}
}}"#;

const OPEN_STORAGE_PAYLOAD: &str = r#"{"pull_request": {
    "title": "Docker volume handling",
    "body": "Fixing the storage problem with volume mounts",
    "number": 7,
    "state": "open",
    "user": {"login": "bob"}
}}"#;

const NO_PULL_REQUEST_PAYLOAD: &str = r#"{"issue": {"number": 1}}"#;

const IRRELEVANT_PAYLOAD: &str = r#"{"pull_request": {
    "title": "Update readme",
    "body": "typo fixes",
    "number": 3,
    "state": "closed",
    "merged": false
}}"#;

fn write_csv(path: &Path, payloads: &[&str]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(["project name", "payload"]).unwrap();
    for payload in payloads {
        writer.write_record(["demo", payload]).unwrap();
    }
    writer.flush().unwrap();
}

async fn collect(config: Config) -> Vec<PullRequestRecord> {
    let processor = BatchProcessor::new(config);
    let mut stream = processor.process();
    let mut records = Vec::new();
    while let Some(result) = stream.next().await {
        records.push(result.expect("batch rows never surface errors"));
    }
    records
}

#[tokio::test]
async fn test_end_to_end_multi_label_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        &dir.path().join("events.csv"),
        &[
            CRITICAL_DOCKER_PAYLOAD,
            NO_PULL_REQUEST_PAYLOAD,
            "not json at all",
            IRRELEVANT_PAYLOAD,
            OPEN_STORAGE_PAYLOAD,
        ],
    );

    let config = ConfigBuilder::new(dir.path()).build().unwrap();
    let records = collect(config).await;

    assert_eq!(records.len(), 2);

    let critical = &records[0];
    assert_eq!(critical.number, 42);
    assert_eq!(critical.state, "closed");
    assert_eq!(critical.merged, Some(true));
    assert_eq!(critical.author, "alice");
    assert_eq!(
        critical.labels,
        AssignedLabels::Multi(vec!["Major Docker Image Upgrade".to_string()])
    );

    let storage = &records[1];
    assert_eq!(storage.number, 7);
    assert!(storage.labels.contains("Storage Issue Fix"));
}

#[tokio::test]
async fn test_end_to_end_single_label_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir.path().join("events.csv"), &[OPEN_STORAGE_PAYLOAD]);

    let config = ConfigBuilder::new(dir.path())
        .policy_str("single")
        .build()
        .unwrap();
    let records = collect(config).await;

    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].labels,
        AssignedLabels::Single("Storage Issue Fix".to_string())
    );
}

#[tokio::test]
async fn test_files_processed_in_deterministic_order() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir.path().join("b.csv"), &[OPEN_STORAGE_PAYLOAD]);
    write_csv(&dir.path().join("a.csv"), &[CRITICAL_DOCKER_PAYLOAD]);

    let config = ConfigBuilder::new(dir.path()).build().unwrap();
    let records = collect(config).await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].number, 42);
    assert_eq!(records[1].number, 7);
}

#[tokio::test]
async fn test_limit_caps_extracted_records() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        &dir.path().join("events.csv"),
        &[CRITICAL_DOCKER_PAYLOAD, OPEN_STORAGE_PAYLOAD],
    );

    let config = ConfigBuilder::new(dir.path()).limit(1).build().unwrap();
    let records = collect(config).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].number, 42);
}

#[tokio::test]
async fn test_relevance_scope_body_drops_title_only_matches() {
    let dir = tempfile::tempdir().unwrap();
    // Docker token appears in the title only
    let title_only = r#"{"pull_request": {"title": "Docker bump", "body": "routine"}}"#;
    write_csv(&dir.path().join("events.csv"), &[title_only]);

    let body_scope = ConfigBuilder::new(dir.path())
        .relevance_str("body")
        .build()
        .unwrap();
    assert!(collect(body_scope).await.is_empty());

    let full_scope = ConfigBuilder::new(dir.path())
        .relevance_str("full")
        .build()
        .unwrap();
    assert_eq!(collect(full_scope).await.len(), 1);
}

#[tokio::test]
async fn test_empty_batch_produces_header_only_table() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        &dir.path().join("events.csv"),
        &[NO_PULL_REQUEST_PAYLOAD, IRRELEVANT_PAYLOAD],
    );

    let config = ConfigBuilder::new(dir.path()).build().unwrap();
    let records = collect(config).await;
    assert!(records.is_empty());

    let out = dir.path().join("out.csv");
    export::write_records_csv(&out, &records).unwrap();
    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[tokio::test]
async fn test_batch_aggregation_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        &dir.path().join("events.csv"),
        &[CRITICAL_DOCKER_PAYLOAD, OPEN_STORAGE_PAYLOAD],
    );

    let config = ConfigBuilder::new(dir.path()).build().unwrap();
    let records = collect(config).await;

    let mut counts = AggregateCounts::new(&Taxonomy::default());
    for record in &records {
        counts.update(&record.labels, &record.state, record.merged);
    }

    let major = counts.get("Major Docker Image Upgrade").unwrap();
    assert_eq!(major.total, 1);
    assert_eq!(major.accepted, 1);

    let storage = counts.get("Storage Issue Fix").unwrap();
    assert_eq!(storage.total, 1);
    assert_eq!(storage.still_open, 1);

    let shares = counts.finalize();
    assert_eq!(shares["Major Docker Image Upgrade"].accepted_pct, 100.0);
    assert_eq!(shares["Storage Issue Fix"].still_open_pct, 100.0);
    // Zero-total labels stay defined
    assert_eq!(shares["Patch Dependency Upgrade"].accepted_pct, 0.0);
}
