// tests/preprocess_pipeline.rs
//
// Anti-gaming preprocessing through the public API.

use chrono::{DateTime, Duration, FixedOffset};
use dev_reputation_analyzer::analyze::{process_events, PreprocessParams, Preprocessor};
use dev_reputation_analyzer::RawEvent;

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

#[test]
fn burst_of_commits_merges_then_gets_working_hours_boost() {
    let t0 = at("2024-02-12T11:00:00Z");
    let events = vec![
        RawEvent::new("commit", t0, 10.0, "acme/tool"),
        RawEvent::new("commit", t0 + Duration::minutes(1), 15.0, "acme/tool"),
    ];
    let out = process_events(&events);
    assert_eq!(out.len(), 1);
    assert!((out[0].count - 27.5).abs() < 1e-9, "got {}", out[0].count);
}

#[test]
fn bot_repo_dropped_regardless_of_count() {
    let out = process_events(&[RawEvent::new(
        "stars",
        at("2024-02-12T11:00:00Z"),
        1e9,
        "acme/tool-bot",
    )]);
    assert!(out.is_empty());
}

#[test]
fn night_commit_penalised() {
    let out = process_events(&[RawEvent::new(
        "commit",
        at("2024-02-12T02:30:00Z"),
        20.0,
        "acme/tool",
    )]);
    assert!((out[0].count - 6.0).abs() < 1e-9);
}

#[test]
fn merged_small_commits_escape_the_trivial_discount() {
    // 6 + 6 = 12 >= 10 after merging, so no 0.5 discount (evening: no timing factor)
    let t0 = at("2024-02-12T20:00:00Z");
    let out = process_events(&[
        RawEvent::new("commit", t0, 6.0, "r"),
        RawEvent::new("commit", t0 + Duration::minutes(2), 6.0, "r"),
    ]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].count, 12.0);
}

#[test]
fn custom_spacing_controls_merging() {
    let t0 = at("2024-02-12T20:00:00Z");
    let events = vec![
        RawEvent::new("stars", t0, 1.0, "r"),
        RawEvent::new("stars", t0 + Duration::minutes(3), 1.0, "r"),
    ];
    let tight = Preprocessor::new(PreprocessParams {
        min_spacing: Duration::minutes(2),
    });
    assert_eq!(tight.process(&events).events.len(), 2);
    assert_eq!(Preprocessor::default().process(&events).events.len(), 1);
}

#[test]
fn exact_spacing_is_not_a_duplicate() {
    let t0 = at("2024-02-12T20:00:00Z");
    let out = process_events(&[
        RawEvent::new("stars", t0, 1.0, "r"),
        RawEvent::new("stars", t0 + Duration::minutes(5), 1.0, "r"),
    ]);
    assert_eq!(out.len(), 2);
}

#[test]
fn output_is_time_ordered() {
    let out = process_events(&[
        RawEvent::new("forks", at("2024-02-12T22:00:00Z"), 1.0, "b"),
        RawEvent::new("stars", at("2024-02-12T20:00:00Z"), 1.0, "a"),
        RawEvent::new("commit", at("2024-02-12T21:00:00Z"), 30.0, "c"),
    ]);
    let kinds: Vec<&str> = out.iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(kinds, vec!["stars", "commit", "forks"]);
}
