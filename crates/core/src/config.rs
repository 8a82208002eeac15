// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! Derives the on-disk layout (WAL and snapshot paths) from a single data
//! directory and carries the retention policy installed at startup.

use crate::retention::RetentionPolicy;
use crate::storage::wal::SNAPSHOT_FILE_NAME;
use std::path::PathBuf;

/// Configuration for opening an engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the WAL and snapshot files
    pub data_dir: PathBuf,
    /// Retention policy installed at startup
    pub retention: RetentionPolicy,
}

impl EngineConfig {
    /// Config rooted at the given directory
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            retention: RetentionPolicy::Full,
        }
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Path of the write-ahead log
    pub fn wal_path(&self) -> PathBuf {
        self.data_dir.join("wal.log")
    }

    /// Path of the snapshot file, sibling to the WAL
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE_NAME)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_dir("data")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
