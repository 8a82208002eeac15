// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-phase startup recovery
//!
//! Recovery rebuilds both the data and the active decision policy from the
//! snapshot and the WAL. Policy records are settled before any data record
//! is applied, so the policy at startup equals the policy at last shutdown.

use super::wal::reader::WalReader;
use super::wal::record::WalRecord;
use super::wal::snapshot;
use crate::clock::Clock;
use crate::policy::DecisionPolicy;
use crate::retention::RetentionPolicy;
use crate::store::TemporalStore;
use crate::version::Version;
use std::path::Path;

/// What recovery found and applied
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Last policy recorded in the snapshot or WAL, if any
    pub policy: Option<DecisionPolicy>,
    /// Keys restored from the snapshot
    pub snapshot_keys: usize,
    /// Data records replayed from the WAL
    pub replayed_records: usize,
    /// WAL lines skipped because they could not be parsed
    pub skipped_lines: usize,
}

/// Replay the snapshot and WAL into an empty store.
///
/// Never fails: unreadable files and malformed lines degrade to warnings.
/// Retention runs per replayed append, as it does on the live write path.
pub fn recover<C: Clock>(
    wal_path: &Path,
    snapshot_path: &Path,
    store: &mut TemporalStore,
    retention: &RetentionPolicy,
    clock: &C,
) -> RecoveryReport {
    let mut report = RecoveryReport::default();
    let now = clock.now();

    // Snapshot first: policy, then data. Snapshots discard version
    // timestamps, so restored entries are stamped with the recovery time.
    match snapshot::read_snapshot(snapshot_path) {
        Ok(data) => {
            if let Some(policy) = data.policy {
                report.policy = Some(policy);
            }
            report.snapshot_keys = data.entries.len();
            for (key, value) in data.entries {
                store.append(&key, Version::new(now, value));
                store.prune(&key, retention, now);
            }
        }
        Err(e) => {
            tracing::warn!(path = %snapshot_path.display(), ?e, "failed to read snapshot; continuing without it");
        }
    }

    let reader = WalReader::open_or_empty(wal_path);

    // Phase A: settle the policy before any data replays (last one wins).
    match reader.records() {
        Ok(records) => {
            for record in records {
                if let Ok(WalRecord::PolicySet { policy }) = record {
                    report.policy = Some(policy);
                }
            }
        }
        Err(e) => {
            tracing::warn!(path = %wal_path.display(), ?e, "failed to read WAL; recovered snapshot state only");
            return report;
        }
    }

    // Phase B: data records at their recorded timestamps. A missing
    // timestamp field (legacy files) falls back to the recovery time.
    if let Ok(records) = reader.records() {
        for record in records {
            match record {
                Ok(WalRecord::Set {
                    key,
                    value,
                    timestamp,
                }) => {
                    let timestamp = timestamp.unwrap_or(now);
                    store.append(&key, Version::new(timestamp, value));
                    store.prune(&key, retention, now);
                    report.replayed_records += 1;
                }
                Ok(WalRecord::Del { key }) => {
                    store.remove(&key);
                    report.replayed_records += 1;
                }
                Ok(WalRecord::PolicySet { .. }) => {} // applied in phase A
                Err(e) => {
                    report.skipped_lines += 1;
                    tracing::warn!(?e, "skipping malformed WAL line");
                }
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
