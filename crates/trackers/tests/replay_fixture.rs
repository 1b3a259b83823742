use std::path::PathBuf;

use probekit_common::config::AppConfig;
use probekit_event_model::entry::{Direction, KeyAction, LogEntry};
use probekit_trackers::writer::read_entries;
use probekit_trackers::{load_event_file, EventFile, ReplaySummary, Replayer};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
        .join("events.jsonl")
}

fn load_fixture() -> EventFile {
    load_event_file(&fixture_path()).expect("fixture events should load")
}

#[test]
fn fixture_header_is_read() {
    let file = load_fixture();
    assert!(file.has_header);
    assert_eq!(file.header.epoch_ms, 1_700_000_000_000);
    assert_eq!(file.events.len(), 21);
}

#[test]
fn fixture_replay_final_state() {
    let file = load_fixture();
    let mut replayer = Replayer::new(&file.header, &AppConfig::default());
    let summary = replayer.run(&file.events).unwrap();

    assert_eq!(
        summary,
        ReplaySummary {
            events: 21,
            entries: 15,
            silent: 6,
        }
    );

    let snapshot = replayer.session().snapshot();

    // Tap screen was reset before the last button tap.
    assert_eq!(snapshot.tap.tap_count, 1);
    assert_eq!(snapshot.tap.time_between_taps_ms, None);
    assert_eq!(snapshot.tap.last_coordinates, None);
    assert_eq!(snapshot.tap.entries.len(), 1);

    let swipes: Vec<(Direction, u64, u64)> = snapshot
        .swipe
        .entries
        .iter()
        .map(|e| (e.direction, e.distance, e.velocity))
        .collect();
    assert_eq!(
        swipes,
        vec![
            (Direction::Up, 0, 0),
            (Direction::Up, 7, 0),
            (Direction::Down, 80, 0),
            (Direction::Left, 51, 500),
            (Direction::Right, 100, 500),
        ]
    );
    assert_eq!(snapshot.swipe.swipe_count, 5);

    let keys: Vec<(&str, KeyAction)> = snapshot
        .key
        .entries
        .iter()
        .map(|e| (e.key.as_str(), e.action))
        .collect();
    assert_eq!(
        keys,
        vec![
            (" ", KeyAction::Added),
            ("s", KeyAction::Deleted),
            ("s", KeyAction::Added),
            ("t", KeyAction::Added),
            ("a", KeyAction::Added),
            ("c", KeyAction::Added),
        ]
    );
    assert_eq!(snapshot.key.text, "bat ");
    assert_eq!(snapshot.key.char_count, 4);
}

#[test]
fn fixture_tap_latency_spans_sources() {
    let file = load_fixture();
    let mut replayer = Replayer::new(&file.header, &AppConfig::default());

    let gaps: Vec<Option<u64>> = file.events[..3]
        .iter()
        .map(|event| match replayer.step(event).unwrap() {
            Some(LogEntry::Tap(entry)) => entry.time_since_last,
            other => panic!("expected a tap entry, got {other:?}"),
        })
        .collect();
    assert_eq!(gaps, vec![None, Some(250), Some(150)]);

    let taps = replayer.session().taps();
    assert_eq!(
        taps.log().iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        vec![
            "10:13:20 PM - SCREEN (50, 60) - 150ms",
            "10:13:20 PM - BUTTON - 250ms",
            "10:13:20 PM - SCREEN (100, 201)",
        ]
    );
}

#[test]
fn fixture_replay_writes_entries() {
    let dir = std::env::temp_dir().join("probekit_test_replay_output");
    let _ = std::fs::remove_dir_all(&dir);
    let output = dir.join("entries.jsonl");

    let file = load_fixture();
    let mut replayer = Replayer::new(&file.header, &AppConfig::default())
        .with_output(output.clone(), &file.header)
        .unwrap();
    let summary = replayer.run(&file.events).unwrap();
    drop(replayer);

    let entries = read_entries(&output).unwrap();
    assert_eq!(entries.len() as u64, summary.entries);
    assert!(matches!(entries.first(), Some(LogEntry::Tap(_))));
    assert!(matches!(entries.last(), Some(LogEntry::Tap(_))));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn custom_caps_apply_to_replay() {
    let file = load_fixture();
    let mut config = AppConfig::default();
    config.limits.swipe_log_cap = 2;
    config.display.time_format = "%H:%M:%S".to_string();

    let mut replayer = Replayer::new(&file.header, &config);
    replayer.run(&file.events).unwrap();

    let swipes = replayer.session().swipes();
    assert_eq!(swipes.log().len(), 2);
    assert_eq!(swipes.swipe_count(), 5);
    assert_eq!(
        swipes.log().latest().map(|e| e.timestamp.as_str()),
        Some("22:13:22")
    );
}
