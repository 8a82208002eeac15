// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned values with millisecond-resolution timestamps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped value in a key's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Wall-clock instant of the write, millisecond resolution
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub value: String,
}

impl Version {
    /// Create a version, truncating the timestamp to millisecond resolution
    /// so the in-memory state always matches what the WAL can represent.
    pub fn new(timestamp: DateTime<Utc>, value: impl Into<String>) -> Self {
        Self {
            timestamp: truncate_to_millis(timestamp),
            value: value.into(),
        }
    }

    /// Epoch milliseconds of this version's timestamp
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Truncate a timestamp to millisecond resolution
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(instant.timestamp_millis()).unwrap_or(instant)
}

/// Reconstruct a timestamp from epoch milliseconds (WAL replay).
/// None for values outside the representable range.
pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
