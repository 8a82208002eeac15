// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only WAL writer
//!
//! The writer owns the enabled/disabled state machine: any I/O failure
//! transitions it to disabled with a warning, and a successful `reset`
//! re-enables it. Engine mutations never fail because the log failed.

use super::record::WalRecord;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from WAL file operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only writer for the durable mutation log
pub struct WalWriter {
    path: PathBuf,
    file: File,
    enabled: bool,
}

impl WalWriter {
    /// Open or create a WAL file, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            enabled: true,
        })
    }

    /// Create a WAL in a unique temporary directory (for testing)
    pub fn open_temp() -> Result<Self, WalError> {
        let dir = std::env::temp_dir().join(format!("sentinel-wal-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir)?;
        Self::open(&dir.join("wal.log"))
    }

    /// Append one record and sync it to disk.
    ///
    /// A disabled writer silently drops the record. On failure the writer
    /// transitions to disabled and warns; the caller treats the append as
    /// best-effort.
    pub fn append(&mut self, record: &WalRecord) -> Result<(), WalError> {
        if !self.enabled {
            return Ok(());
        }
        match self.write_line(record) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), ?e, "WAL append failed; disabling WAL");
                self.enabled = false;
                Err(e)
            }
        }
    }

    fn write_line(&mut self, record: &WalRecord) -> Result<(), WalError> {
        let line = record.to_line();
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Truncate the log and reopen it for append (after a snapshot).
    /// A successful reset re-enables a previously disabled writer.
    pub fn reset(&mut self) -> Result<(), WalError> {
        match self.truncate_and_reopen() {
            Ok(()) => {
                self.enabled = true;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), ?e, "WAL reset failed; disabling WAL");
                self.enabled = false;
                Err(e)
            }
        }
    }

    fn truncate_and_reopen(&mut self) -> Result<(), WalError> {
        let truncated = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)?;
        truncated.sync_all()?;
        drop(truncated);

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        Ok(())
    }

    /// Flush pending writes to disk
    pub fn flush(&mut self) -> Result<(), WalError> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Whether the writer is accepting records
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
