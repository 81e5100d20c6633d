//! Integration tests for extraction and the tracking cycles.
//!
//! These tests drive the public API end to end:
//! 1. Parse a captured loss-list page
//! 2. Track it against a persisted baseline
//! 3. Compare it against an archived snapshot

use chrono::{NaiveDate, TimeZone, Utc};
use losswatch::{
    collect_losses, compare_against_date, parse_losses, track_against_baseline, Baseline,
    BaselineStore, FileStore, Loss, SourceError, Status, StoreError, TrackerConfig, TrackerError,
    testing::{loss_page, MemoryStore, MockPublisher, MockSource},
};

const FIXTURE: &str = include_str!("fixtures/losses.html");

const RU: &str = "http://ru.test/losses";
const UA: &str = "http://ua.test/losses";

/// Helper to build a two-page config.
fn config() -> TrackerConfig {
    TrackerConfig::new(vec![])
        .with_source(UA, "ukrainian")
        .with_source(RU, "russian")
}

/// Helper to serve the fixture as the russian page.
fn source() -> MockSource {
    MockSource::new()
        .with_page(UA, loss_page(&[("T-64BV", "(1, damaged)")]))
        .with_page(RU, FIXTURE)
}

#[test]
fn test_fixture_skips_only_the_malformed_entry() {
    let losses = collect_losses(FIXTURE.as_bytes()).unwrap();

    assert_eq!(losses.len(), 7);
    assert_eq!(
        losses[0],
        Loss::new(
            "T-72B3",
            Status::Destroyed,
            1,
            "https://i.postimg.cc/abc/1001-t72b3-destr.jpg"
        )
    );

    // Redirect wrapper is stripped from the link.
    assert_eq!(losses[2].status, Status::Captured);
    assert_eq!(losses[2].link, "https://i.postimg.cc/abc/1003-t72b3-capt.jpg");

    // One caption listing two numbers fans out into two records.
    assert_eq!(losses[3].number, 1);
    assert_eq!(losses[4].number, 2);
    assert_eq!(losses[3].link, losses[4].link);
    assert_eq!(losses[3].kind, "T-80BVM");

    // Whitespace around the target is trimmed.
    assert_eq!(losses[5].link, "https://i.postimg.cc/ghi/1005-bmp2-aband.jpg");

    assert_eq!(losses[6].kind, "Project 1164 guided missile cruiser Moskva");
    assert_eq!(losses[6].status, Status::Sunk);

    assert!(losses.iter().all(|loss| !loss.link.contains("unknown")));
}

#[test]
fn test_parse_is_deterministic() {
    let first: Vec<_> = parse_losses(FIXTURE.as_bytes()).collect();
    let second: Vec<_> = parse_losses(FIXTURE.as_bytes()).collect();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_baseline_cycle() {
    let source = source();
    let store = MemoryStore::new();
    let publisher = MockPublisher::new();

    // First run: empty baseline, everything is new.
    let first = track_against_baseline(&config(), &source, &store, &publisher)
        .await
        .unwrap();
    assert_eq!(first.new_losses.len(), 8);
    assert_eq!(first.new_losses[0].country(), "ukrainian");
    assert_eq!(first.counts_by_country["russian"], 7);

    // Second run: nothing changed.
    let second = track_against_baseline(&config(), &source, &store, &publisher)
        .await
        .unwrap();
    assert!(second.new_losses.is_empty());

    // Drop one record from the persisted baseline; exactly that one is new again.
    let mut baseline = store.read_baseline("oryx/last.json").await.unwrap();
    let mut russian = baseline.get("russian").to_vec();
    let removed = russian.remove(5);
    baseline.insert("russian", russian);
    store.write_baseline("oryx/last.json", &baseline).await.unwrap();

    let third = track_against_baseline(&config(), &source, &store, &publisher)
        .await
        .unwrap();
    assert_eq!(third.new_losses.len(), 1);
    assert_eq!(third.new_losses[0].loss(), &removed);

    assert_eq!(publisher.loss_batches(), 2);
    assert_eq!(publisher.published_losses().len(), 9);
}

#[tokio::test]
async fn test_failed_fetch_aborts_without_persisting() {
    let source = source().with_failure(UA);
    let store = MemoryStore::new();

    let err = track_against_baseline(&config(), &source, &store, &MockPublisher::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TrackerError::Source(SourceError::Http { .. })));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_malformed_baseline_aborts_without_persisting() {
    let store = MemoryStore::new().with_raw("oryx/last.json", "[1, 2, 3]");

    let err = track_against_baseline(&config(), &source(), &store, &MockPublisher::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TrackerError::Store(StoreError::Malformed { .. })));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_publish_failure_does_not_block_persistence() {
    let store = MemoryStore::new();
    let publisher = MockPublisher::new().failing_losses();

    let result = track_against_baseline(&config(), &source(), &store, &publisher)
        .await
        .unwrap();

    assert!(!result.published);
    assert!(result.baseline_written);
    assert_eq!(store.writes().last().map(String::as_str), Some("oryx/last.json"));

    let delta_key = result.delta_key.unwrap();
    let delta: serde_json::Value = serde_json::from_str(&store.raw(&delta_key).unwrap()).unwrap();
    assert_eq!(delta.as_array().unwrap().len(), 8);
    assert_eq!(delta[1][0], "russian");
    assert_eq!(delta[1][1]["status"], "destroyed");
}

#[tokio::test]
async fn test_existing_baseline_format_is_accepted() {
    // Baselines written by earlier runs: plain objects keyed by country.
    let raw = r#"{
        "ukrainian": [{"type": "T-64BV", "status": "damaged", "number": 1, "link": "http://img.test/T-64BV-1.jpg"}],
        "russian": [],
        "belarusian": []
    }"#;
    let store = MemoryStore::new().with_raw("oryx/last.json", raw);

    let result = track_against_baseline(&config(), &source(), &store, &MockPublisher::new())
        .await
        .unwrap();

    assert_eq!(result.new_for("ukrainian"), 0);
    assert_eq!(result.new_for("russian"), 7);
}

#[tokio::test]
async fn test_file_store_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    track_against_baseline(&config(), &source(), &store, &MockPublisher::new())
        .await
        .unwrap();

    let persisted = std::fs::read_to_string(dir.path().join("oryx/last.json")).unwrap();
    let baseline = Baseline::from_json(&persisted).unwrap();
    assert_eq!(baseline.total(), 8);
    assert_eq!(baseline.countries().collect::<Vec<_>>(), ["ukrainian", "russian"]);

    let deltas = std::fs::read_dir(dir.path().join("oryx")).unwrap().count();
    assert_eq!(deltas, 2);
}

#[tokio::test]
async fn test_point_in_time_comparison() {
    let from = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let captured = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

    // The archived page predates the cruiser entry.
    let archived = FIXTURE.replace("(1, sunk)", "(sunk)");
    let source = source()
        .with_snapshot(RU, from, archived, captured)
        .with_snapshot(UA, from, loss_page(&[("T-64BV", "(1, damaged)")]), captured);

    let comparison = compare_against_date(&config(), &source, from).await.unwrap();

    assert_eq!(comparison.losses.len(), 1);
    assert_eq!(comparison.losses[0].country(), "russian");
    assert_eq!(comparison.losses[0].loss().status, Status::Sunk);
    assert_eq!(comparison.since, captured);

    let summary = comparison.summary();
    assert_eq!(summary.totals, vec!["Russian losses: 1"]);
    assert_eq!(
        summary.rows["russian"],
        vec!["Project 1164 guided missile cruiser Moskva total: 1, sunk: 1"]
    );
}
