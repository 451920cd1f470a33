//! End-to-end pipeline tests against a temp output directory.

use std::path::Path;

use sheetcal_core::config::BuildConfig;
use sheetcal_core::pipeline;

const SAMPLE_CSV: &str = "\
Calendar,Title,Start,End,Location
work,Team Sync,2025-03-10 09:00,2025-03-10 10:00,Room 5
home,Dentist,2025-03-11 14:30,,
work,Offsite,2025-04-01,2025-04-03,
";

fn config_for(output_dir: &Path) -> BuildConfig {
    BuildConfig {
        output_dir: output_dir.to_path_buf(),
        ..BuildConfig::default()
    }
}

/// Read a feed file with the generation timestamp stripped, for
/// determinism comparisons.
fn read_without_dtstamp(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.starts_with("DTSTAMP:"))
        .collect::<Vec<_>>()
        .join("\r\n")
}

#[test]
fn test_build_writes_one_feed_per_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let report = pipeline::build(&config_for(dir.path()), SAMPLE_CSV).unwrap();

    assert_eq!(report.feeds.len(), 2);
    assert_eq!(report.total_events(), 3);
    assert!(report.failed.is_empty());
    assert!(report.skipped.is_empty());

    // First-appearance feed order.
    assert_eq!(report.feeds[0].slug, "work");
    assert_eq!(report.feeds[1].slug, "home");

    let work = std::fs::read_to_string(dir.path().join("calendars/work.ics")).unwrap();
    let home = std::fs::read_to_string(dir.path().join("calendars/home.ics")).unwrap();

    assert!(work.contains("SUMMARY:Team Sync"));
    assert!(work.contains("DTSTART:20250310T090000Z"));
    assert!(work.contains("DTEND:20250310T100000Z"));
    assert!(work.contains("LOCATION:Room 5"));
    assert!(!work.contains("Dentist"));

    assert!(home.contains("SUMMARY:Dentist"));
    // Default one-hour duration.
    assert!(home.contains("DTEND:20250311T153000Z"));
    assert!(!home.contains("Team Sync"));

    // Multi-day all-day span with exclusive end.
    assert!(work.contains("DTSTART;VALUE=DATE:20250401"));
    assert!(work.contains("DTEND;VALUE=DATE:20250404"));
}

#[test]
fn test_build_writes_manifest_and_subscribe_page() {
    let dir = tempfile::tempdir().unwrap();
    pipeline::build(&config_for(dir.path()), SAMPLE_CSV).unwrap();

    let manifest = std::fs::read_to_string(dir.path().join("calendars.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&manifest).unwrap();

    assert_eq!(entries[0]["name"], "work");
    assert_eq!(entries[0]["ics"], "/calendars/work.ics");
    assert_eq!(entries[1]["slug"], "home");

    let page = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(page.contains("calendars.json"));
}

#[test]
fn test_identical_input_gives_identical_output_modulo_dtstamp() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    pipeline::build(&config_for(dir_a.path()), SAMPLE_CSV).unwrap();
    pipeline::build(&config_for(dir_b.path()), SAMPLE_CSV).unwrap();

    for slug in ["work", "home"] {
        let rel = format!("calendars/{slug}.ics");
        assert_eq!(
            read_without_dtstamp(&dir_a.path().join(&rel)),
            read_without_dtstamp(&dir_b.path().join(&rel)),
        );
    }

    assert_eq!(
        std::fs::read_to_string(dir_a.path().join("calendars.json")).unwrap(),
        std::fs::read_to_string(dir_b.path().join("calendars.json")).unwrap(),
    );
}

#[test]
fn test_bad_rows_are_skipped_and_the_rest_still_builds() {
    let csv = "\
Calendar,Title,Start
work,Has no start,
work,Short row
home,Fine,2025-03-12 08:00
";

    let dir = tempfile::tempdir().unwrap();
    let report = pipeline::build(&config_for(dir.path()), csv).unwrap();

    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].line, 2);
    assert!(report.skipped[0].reason.contains("missing start"));
    assert_eq!(report.skipped[1].line, 3);
    assert!(report.skipped[1].reason.contains("malformed row"));

    assert_eq!(report.feeds.len(), 1);
    assert_eq!(report.feeds[0].slug, "home");

    let home = std::fs::read_to_string(dir.path().join("calendars/home.ics")).unwrap();
    assert!(home.contains("SUMMARY:Fine"));
    assert!(!dir.path().join("calendars/work.ics").exists());
}

#[test]
fn test_rebuild_fully_replaces_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());

    pipeline::build(&config, SAMPLE_CSV).unwrap();

    // Second run with one event gone: the feed file shrinks, no merge.
    let smaller = "\
Calendar,Title,Start,End,Location
work,Team Sync,2025-03-10 09:00,2025-03-10 10:00,Room 5
home,Dentist,2025-03-11 14:30,,
";
    pipeline::build(&config, smaller).unwrap();

    let work = std::fs::read_to_string(dir.path().join("calendars/work.ics")).unwrap();
    assert!(work.contains("Team Sync"));
    assert!(!work.contains("Offsite"));
}

#[test]
fn test_failed_feed_write_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();

    // A directory squatting on the work feed's path makes its rename fail.
    std::fs::create_dir_all(dir.path().join("calendars/work.ics")).unwrap();

    let report = pipeline::build(&config_for(dir.path()), SAMPLE_CSV).unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "work");
    assert!(!report.failed[0].error.is_empty());

    // The other feed, the manifest, and the page still land on disk.
    assert_eq!(report.feeds.len(), 1);
    assert_eq!(report.feeds[0].slug, "home");
    let home = std::fs::read_to_string(dir.path().join("calendars/home.ics")).unwrap();
    assert!(home.contains("SUMMARY:Dentist"));
    assert!(dir.path().join("calendars.json").exists());
    assert!(dir.path().join("index.html").exists());
}

#[test]
fn test_uids_are_stable_across_runs() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    pipeline::build(&config_for(dir_a.path()), SAMPLE_CSV).unwrap();
    pipeline::build(&config_for(dir_b.path()), SAMPLE_CSV).unwrap();

    let uid_lines = |path: &Path| -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("UID:"))
            .map(str::to_string)
            .collect()
    };

    let a = uid_lines(&dir_a.path().join("calendars/work.ics"));
    let b = uid_lines(&dir_b.path().join("calendars/work.ics"));
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}
