// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use chrono::DateTime;
use tempfile::TempDir;

fn fixture() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let wal_path = dir.path().join("wal.log");
    let snapshot_path = dir.path().join("snapshot.db");
    (dir, wal_path, snapshot_path)
}

fn clock_at(millis: i64) -> FakeClock {
    FakeClock::at(DateTime::from_timestamp_millis(millis).unwrap())
}

#[test]
fn recover_from_nothing_is_empty() {
    let (_dir, wal_path, snapshot_path) = fixture();
    let mut store = TemporalStore::new();

    let report = recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(10_000),
    );

    assert_eq!(report, RecoveryReport::default());
    assert!(store.is_empty());
}

#[test]
fn wal_set_records_replay_at_their_timestamps() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(&wal_path, "SET price 100 1000\nSET price 150 2000\n").unwrap();
    let mut store = TemporalStore::new();

    let report = recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(10_000),
    );

    assert_eq!(report.replayed_records, 2);
    let history = store.history("price");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].timestamp_millis(), 1000);
    assert_eq!(history[1].timestamp_millis(), 2000);
}

#[test]
fn wal_del_records_remove_keys() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(&wal_path, "SET a 1 1000\nSET b 2 2000\nDEL a\n").unwrap();
    let mut store = TemporalStore::new();

    recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(10_000),
    );

    assert!(!store.contains_key("a"));
    assert_eq!(store.latest("b"), Some("2"));
}

#[test]
fn last_policy_record_wins() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(
        &wal_path,
        "POLICY SET STRICT\nSET k v 1000\nPOLICY SET DEV_FRIENDLY\n",
    )
    .unwrap();
    let mut store = TemporalStore::new();

    let report = recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(10_000),
    );

    assert_eq!(report.policy, Some(DecisionPolicy::DevFriendly));
}

#[test]
fn policy_interleaved_with_data_still_recovers_data() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(
        &wal_path,
        "SET a 1 1000\nPOLICY SET STRICT\nSET a 2 2000\n",
    )
    .unwrap();
    let mut store = TemporalStore::new();

    let report = recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(10_000),
    );

    assert_eq!(report.policy, Some(DecisionPolicy::Strict));
    assert_eq!(store.history("a").len(), 2);
    assert_eq!(report.replayed_records, 2);
}

#[test]
fn legacy_set_without_timestamp_uses_recovery_time() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(&wal_path, "SET price 100\n").unwrap();
    let mut store = TemporalStore::new();

    recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(42_000),
    );

    assert_eq!(store.history("price")[0].timestamp_millis(), 42_000);
}

#[test]
fn malformed_lines_are_skipped_and_counted() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(
        &wal_path,
        "SET a 1 1000\nGARBAGE\nPOLICY SET LENIENT\nSET b 2 2000\n",
    )
    .unwrap();
    let mut store = TemporalStore::new();

    let report = recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(10_000),
    );

    assert_eq!(report.replayed_records, 2);
    assert_eq!(report.skipped_lines, 2);
    assert_eq!(store.latest("a"), Some("1"));
    assert_eq!(store.latest("b"), Some("2"));
}

#[test]
fn snapshot_entries_restore_with_recovery_timestamp() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(&snapshot_path, "POLICY SET STRICT\nSET name alice\n").unwrap();
    let mut store = TemporalStore::new();

    let report = recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(99_000),
    );

    assert_eq!(report.policy, Some(DecisionPolicy::Strict));
    assert_eq!(report.snapshot_keys, 1);
    assert_eq!(store.latest("name"), Some("alice"));
    assert_eq!(store.history("name")[0].timestamp_millis(), 99_000);
}

#[test]
fn wal_records_apply_on_top_of_snapshot() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(&snapshot_path, "SET name alice\nSET price 100\n").unwrap();
    std::fs::write(&wal_path, "SET name bob 100000\nDEL price\n").unwrap();
    let mut store = TemporalStore::new();

    recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(50_000),
    );

    assert_eq!(store.latest("name"), Some("bob"));
    assert!(!store.contains_key("price"));
}

#[test]
fn wal_policy_overrides_snapshot_policy() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(&snapshot_path, "POLICY SET STRICT\n").unwrap();
    std::fs::write(&wal_path, "POLICY SET SAFE_DEFAULT\n").unwrap();
    let mut store = TemporalStore::new();

    let report = recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::Full,
        &clock_at(10_000),
    );

    assert_eq!(report.policy, Some(DecisionPolicy::SafeDefault));
}

#[test]
fn retention_applies_during_replay() {
    let (_dir, wal_path, snapshot_path) = fixture();
    std::fs::write(
        &wal_path,
        "SET x a 1000\nSET x b 2000\nSET x c 3000\nSET x d 4000\n",
    )
    .unwrap();
    let mut store = TemporalStore::new();

    recover(
        &wal_path,
        &snapshot_path,
        &mut store,
        &RetentionPolicy::last_n(2),
        &clock_at(10_000),
    );

    let values: Vec<&str> = store.history("x").iter().map(|v| v.value.as_str()).collect();
    assert_eq!(values, vec!["c", "d"]);
}
