// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot write and read for WAL compaction
//!
//! A snapshot is a sibling text file holding the latest value per key and
//! the decision policy active when it was taken. Snapshots intentionally
//! discard version timestamps: they are lossy for history but authoritative
//! for current state. Writing goes through a temporary file and an atomic
//! rename so a partial snapshot is never picked up.

use super::reader::{WalReadError, WalReader};
use super::record::WalRecord;
use crate::policy::DecisionPolicy;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed snapshot file name, sibling to the WAL
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.db";

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAL read error: {0}")]
    Read(#[from] WalReadError),
}

/// Parsed contents of a snapshot file
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SnapshotData {
    pub policy: Option<DecisionPolicy>,
    pub entries: Vec<(String, String)>,
}

/// Derive the snapshot path for a WAL path (same directory, fixed name)
pub fn snapshot_path(wal_path: &Path) -> PathBuf {
    match wal_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(SNAPSHOT_FILE_NAME),
        _ => PathBuf::from(SNAPSHOT_FILE_NAME),
    }
}

/// Write a snapshot atomically (temp file + rename)
pub fn write_snapshot(
    path: &Path,
    policy: DecisionPolicy,
    entries: &[(String, String)],
) -> Result<(), SnapshotError> {
    let temp_path = path.with_extension("db.tmp");
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", WalRecord::policy(policy).to_line())?;
        for (key, value) in entries {
            writeln!(writer, "SET {} {}", key, value)?;
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Read a snapshot. A missing file yields empty data; malformed lines are
/// skipped with a warning.
pub fn read_snapshot(path: &Path) -> Result<SnapshotData, SnapshotError> {
    let mut data = SnapshotData::default();

    for record in WalReader::open_or_empty(path).records()? {
        match record {
            Ok(WalRecord::PolicySet { policy }) => data.policy = Some(policy),
            Ok(WalRecord::Set { key, value, .. }) => data.entries.push((key, value)),
            // Snapshots never contain deletions; tolerate and drop them
            Ok(WalRecord::Del { .. }) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), ?e, "skipping malformed snapshot line");
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
