// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL reader: line-oriented record iteration
//!
//! Malformed lines surface as per-line errors with their line number so the
//! caller decides whether to skip or halt. Startup recovery skips them;
//! stricter callers may stop at the first error.

use super::record::{RecordError, WalRecord};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading records
#[derive(Debug, Error)]
pub enum WalReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record at line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: RecordError,
    },
}

/// Reader over a WAL (or snapshot) file
pub struct WalReader {
    path: PathBuf,
}

impl WalReader {
    /// Create a reader; a missing file yields an empty iteration
    pub fn open_or_empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Iterate records in file order
    pub fn records(&self) -> Result<WalRecordIter, WalReadError> {
        let reader = if self.path.exists() {
            Some(BufReader::new(File::open(&self.path)?))
        } else {
            None
        };
        Ok(WalRecordIter {
            reader,
            line_number: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Iterator over records with line-number tracking
pub struct WalRecordIter {
    reader: Option<BufReader<File>>,
    line_number: u64,
}

impl WalRecordIter {
    /// Line number of the most recently read line (1-based)
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl Iterator for WalRecordIter {
    type Item = Result<WalRecord, WalReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let line_number = self.line_number;
                    return Some(WalRecord::parse(trimmed).map_err(|source| {
                        WalReadError::Malformed {
                            line: line_number,
                            source,
                        }
                    }));
                }
                Err(e) => return Some(Err(WalReadError::Io(e))),
            }
        }
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
