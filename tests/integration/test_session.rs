//! Integration tests for the durable stores and the analytics pipeline
//!
//! These tests run against real files in a scratch directory: config
//! loading, profile persistence, progress logging, and the report built
//! on top of the accumulated history.

use std::path::PathBuf;

use chrono::{Duration, Utc};

use edapt_report::{LearningReport, MarkdownGenerator, ProgressSummary};
use edapt_session::{
    attention_check, ActivityKind, Config, Disability, ProfileStore, ProgressEntry, ProgressLog,
    StudentProfile, BREAK_ACTIVITIES,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("edapt_session_it_{name}"));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

/// Config loading falls back to defaults when no file exists, and the
/// store paths land inside the configured data directory.
#[test]
fn test_config_defaults_without_file() {
    let dir = scratch_dir("config_defaults");

    let config = Config::load_from_dir(&dir).expect("Defaults should load");
    assert_eq!(config.endpoint, "http://localhost:11434");
    assert_eq!(config.models.fast, "gemma3n:e2b");

    let config = Config {
        data_dir: dir.to_string_lossy().to_string(),
        ..config
    };
    assert!(config.profile_path().starts_with(&dir));
    assert!(config.progress_path().starts_with(&dir));

    std::fs::remove_dir_all(&dir).ok();
}

/// A config file on disk overrides defaults field by field.
#[test]
fn test_config_file_overrides() {
    let dir = scratch_dir("config_file");
    let config_path = dir.join("edapt.json");
    std::fs::write(
        &config_path,
        r#"{"endpoint": "http://model-host:9000", "models": {"fast": "small-model"}}"#,
    )
    .expect("Failed to write config");

    let config = Config::load_from_dir(&dir).expect("Config should load");
    assert_eq!(config.endpoint, "http://model-host:9000");
    assert_eq!(config.models.fast, "small-model");
    // Unspecified fields keep their defaults
    assert_eq!(config.models.vision, "gemma3n:e4b");
    assert_eq!(config.request_timeout_secs, 120);

    std::fs::remove_dir_all(&dir).ok();
}

/// The profile round-trips through disk with tags deduplicated.
#[tokio::test]
async fn test_profile_round_trip_with_dedup() {
    let dir = scratch_dir("profile_roundtrip");
    let store = ProfileStore::new(dir.join("student_profile.json"));

    let profile = StudentProfile {
        disabilities: vec![
            Disability::Dyslexia,
            Disability::Adhd,
            Disability::Dyslexia,
        ],
        attention_span: 20,
        ..Default::default()
    };
    store.save(&profile).await.expect("Save should succeed");

    let loaded = store.load().await;
    assert_eq!(
        loaded.disabilities,
        vec![Disability::Dyslexia, Disability::Adhd]
    );
    assert_eq!(loaded.attention_span, 20);

    std::fs::remove_dir_all(&dir).ok();
}

/// A corrupted profile record falls back to defaults instead of failing.
#[tokio::test]
async fn test_corrupt_profile_yields_defaults() {
    let dir = scratch_dir("profile_corrupt");
    let path = dir.join("student_profile.json");
    std::fs::write(&path, "{ not valid json").expect("Failed to write corrupt record");

    let store = ProfileStore::new(&path);
    let loaded = store.load().await;
    assert_eq!(loaded, StudentProfile::default());

    std::fs::remove_dir_all(&dir).ok();
}

/// History accumulated through the log feeds the analytics pipeline:
/// summary, streak, insights, and the rendered report agree.
#[tokio::test]
async fn test_progress_log_to_report_pipeline() {
    let dir = scratch_dir("pipeline");
    let log = ProgressLog::new(dir.join("progress_student.json"));

    // Three consecutive days of work, quiz scores improving
    let base = Utc::now() - Duration::days(2);
    for (offset, score) in [(0, 75.0), (1, 85.0), (2, 95.0)] {
        let mut entry = ProgressEntry::new(
            "Fractions",
            25.0,
            Some(score),
            ActivityKind::Quiz,
            vec![Disability::Dyslexia],
        );
        entry.timestamp = base + Duration::days(offset);
        log.append(&entry).await.expect("Append should succeed");
    }

    let history = log.load_history().await.expect("History should load");
    assert_eq!(history.len(), 3);

    let summary = ProgressSummary::from_history(&history);
    assert_eq!(summary.streak_days, 3);
    assert_eq!(summary.learning_days, 3);
    assert_eq!(summary.average_quiz_score, Some(85.0));
    assert_eq!(summary.top_topic(), Some("Fractions"));

    let profile = StudentProfile {
        disabilities: vec![Disability::Dyslexia],
        ..Default::default()
    };
    let report = LearningReport::build(&history, &profile);

    // 75 minutes total earns the time insight; the dyslexia tag earns
    // the simplifier recommendation
    assert!(report.insights.iter().any(|i| i.title == "Time Champion"));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("text simplifier")));

    let markdown = MarkdownGenerator::new(&report).generate();
    assert!(markdown.contains("Learning Streak: 3 days in a row"));
    assert!(markdown.contains("| Fractions | 75.0 |"));

    std::fs::remove_dir_all(&dir).ok();
}

/// The attention monitor suggests an activity from the published list,
/// so a front end can recognize and style the suggestions.
#[test]
fn test_break_activity_comes_from_published_list() {
    let profile = StudentProfile {
        attention_span: 1,
        ..Default::default()
    };

    let check = attention_check(&profile, 120);
    assert!(check.need_break);
    let activity = check.activity.expect("Break due, activity missing");
    assert!(BREAK_ACTIVITIES.contains(&activity.as_str()));
}

/// A torn line in the middle of the log is skipped, not fatal.
#[tokio::test]
async fn test_torn_progress_line_is_skipped() {
    let dir = scratch_dir("torn_line");
    let path = dir.join("progress_student.json");
    let log = ProgressLog::new(&path);

    let entry = ProgressEntry::new("Reading", 10.0, None, ActivityKind::Reading, Vec::new());
    log.append(&entry).await.expect("Append should succeed");

    // Simulate a crash mid-write
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .expect("Failed to open log");
    file.write_all(b"{\"timestamp\": \"2026-08-")
        .expect("Failed to append torn line");
    file.write_all(b"\n").expect("Failed to append newline");
    drop(file);

    let entry = ProgressEntry::new("Math", 15.0, None, ActivityKind::Lesson, Vec::new());
    log.append(&entry).await.expect("Append should succeed");

    let history = log.load_history().await.expect("History should load");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].topic, "Reading");
    assert_eq!(history[1].topic, "Math");

    std::fs::remove_dir_all(&dir).ok();
}
